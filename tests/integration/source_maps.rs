//! Source maps produced by the pipeline

use squeeze::backends::sourcemap::{RawSourceMap, SourceMapConsumer};
use squeeze::{minify, MinifyOptions, MinifyOutput, SourceMapOptions};

const SOURCE: &str = "function hello () {
  function world () {
    return 2;
  };

  return world() + world();
};
";

fn options_with_map(
    source_name: Option<&str>,
    map: SourceMapOptions,
) -> MinifyOptions {
    let mut options = MinifyOptions::default().with_source_map(map);
    options.parse.source_name = source_name.map(str::to_string);
    options
}

fn compile_with_map(
    source: &str,
    options: &MinifyOptions,
) -> (String, RawSourceMap) {
    let MinifyOutput { code, map } = minify(source, options).unwrap();
    let raw = serde_json::from_str(&map.unwrap()).unwrap();
    (code, raw)
}

#[test]
fn test_map_metadata() {
    let options = options_with_map(
        Some("ahoy.js"),
        SourceMapOptions {
            file: Some("ahoy.min.js".into()),
            root: Some("http://localhost/".into()),
            ..SourceMapOptions::default()
        },
    );
    let (code, raw) = compile_with_map(SOURCE, &options);
    assert!(code.len() < SOURCE.len());
    assert_eq!(raw.version, 3);
    assert_eq!(raw.file.as_deref(), Some("ahoy.min.js"));
    assert_eq!(raw.sources, vec!["ahoy.js"]);
    assert_eq!(raw.names, vec!["hello", "world"]);
    assert_eq!(raw.source_root.as_deref(), Some("http://localhost/"));
    assert!(!raw.mappings.starts_with(';'), "{}", raw.mappings);
}

#[test]
fn test_mapped_positions_point_at_names() {
    let options = options_with_map(Some("ahoy.js"), SourceMapOptions::default());
    let MinifyOutput { code, map } = minify(SOURCE, &options).unwrap();
    let consumer = SourceMapConsumer::from_json(&map.unwrap()).unwrap();

    let column = code.find("hello").unwrap();
    let original = consumer.original_position_for(1, column).unwrap();
    assert_eq!(original.source, "ahoy.js");
    assert_eq!((original.line, original.column), (1, 9));
    assert_eq!(original.name.as_deref(), Some("hello"));
}

#[test]
fn test_copyright_comment_shifts_first_mapping() {
    let source = format!("/* @copyright Conrad Irwin */\n{}", SOURCE);
    let options = options_with_map(
        Some("ahoy.js"),
        SourceMapOptions {
            root: Some("http://localhost/".into()),
            ..SourceMapOptions::default()
        },
    );
    let (code, raw) = compile_with_map(&source, &options);
    assert!(code.starts_with("/* @copyright Conrad Irwin */\n"), "{}", code);
    assert!(raw.mappings.starts_with(';'), "{}", raw.mappings);
}

#[test]
fn test_input_map_composition() {
    let first = options_with_map(
        Some("ahoy.js"),
        SourceMapOptions {
            root: Some("http://localhost/".into()),
            ..SourceMapOptions::default()
        },
    )
    .without_mangle();
    let MinifyOutput { code: minified, map } = minify(SOURCE, &first).unwrap();
    assert_eq!(minified.lines().count(), 1);

    let second = options_with_map(
        None,
        SourceMapOptions {
            input_map: map,
            ..SourceMapOptions::default()
        },
    );
    let (_, raw) = compile_with_map(SOURCE, &second);
    assert_eq!(raw.sources, vec!["http://localhost/ahoy.js"]);

    let consumer = SourceMapConsumer::from_raw(raw).unwrap();
    assert!(consumer.mapping_count() > 0);
    let first_mapping = consumer.original_position_for(1, 0).unwrap();
    assert_eq!(first_mapping.line, 1);
}

#[test]
fn test_empty_source_root_in_input_map() {
    let first = options_with_map(
        Some("ahoy.js"),
        SourceMapOptions {
            root: Some(String::new()),
            ..SourceMapOptions::default()
        },
    )
    .without_mangle();
    let map = minify(SOURCE, &first).unwrap().map;

    let second = options_with_map(
        None,
        SourceMapOptions {
            input_map: map,
            ..SourceMapOptions::default()
        },
    );
    let (_, raw) = compile_with_map(SOURCE, &second);
    assert_eq!(raw.sources, vec!["ahoy.js"]);
}

#[test]
fn test_annotations() {
    let options = options_with_map(
        Some("ahoy.js"),
        SourceMapOptions {
            map_url: Some("http://example.com/map".into()),
            url: Some("http://example.com/source".into()),
            ..SourceMapOptions::default()
        },
    );
    let code = minify(SOURCE, &options).unwrap().code;
    assert!(code.contains("\n//# sourceMappingURL=http://example.com/map"), "{}", code);
    assert!(code.contains("\n//# sourceURL=http://example.com/source"), "{}", code);
}

/// Minified code with its map inlined, split into the code line and the
/// annotation text after `//`
fn inlined() -> (String, String) {
    let options = options_with_map(
        Some("ahoy.js"),
        SourceMapOptions {
            sources_content: true,
            inline: true,
            ..SourceMapOptions::default()
        },
    );
    let code = minify(SOURCE, &options).unwrap().code;
    assert!(code.contains("\n//# sourceMappingURL=data:application/json;charset=utf-8;base64,"));
    let mut lines = code.split('\n');
    let body = lines.next().unwrap().to_string();
    let annotation = lines.next().unwrap()[2..].to_string();
    (body, annotation)
}

fn embedded_sources(minified: &str) -> Option<Vec<Option<String>>> {
    let options = MinifyOptions::default().with_source_map(SourceMapOptions {
        sources_content: true,
        ..SourceMapOptions::default()
    });
    let (_, raw) = compile_with_map(minified, &options);
    raw.sources_content
}

fn assert_has_inline_map(minified: &str) {
    let contents = embedded_sources(minified).unwrap_or_default();
    assert!(contents.contains(&Some(SOURCE.to_string())), "{:?}", contents);
}

#[test]
fn test_inline_map_from_line_comment() {
    let (code, annotation) = inlined();
    assert_has_inline_map(&format!("{}\n//{}", code, annotation));
}

#[test]
fn test_inline_map_from_block_comments() {
    let (code, annotation) = inlined();
    assert_has_inline_map(&format!("{}\n/*{}*/", code, annotation));
    assert_has_inline_map(&format!("{}\n/*\n{}\n*/", code, annotation));
    assert_has_inline_map(&format!("{}\n/*\n//{}\n*/", code, annotation));
}

#[test]
fn test_inline_map_only_at_end_of_file() {
    let (code, annotation) = inlined();
    let minified = format!("{}\n//{}\nhello();", code, annotation);
    let contents = embedded_sources(&minified).unwrap_or_default();
    assert!(!contents.contains(&Some(SOURCE.to_string())));
}

#[test]
fn test_inline_map_before_other_annotations() {
    let (code, annotation) = inlined();
    let minified = format!(
        "{}\n\n        //{}\n\n        //# sourceURL=http://example.com/source.js\n        //# sourceURL=http://example.com/source.js\n      ",
        code, annotation
    );
    assert_has_inline_map(&minified);
}

#[test]
fn test_invalid_data_uri_ignored() {
    let (code, _) = inlined();
    let minified = format!("{}\n//# sourceMappingURL=data:application/javascript,foobar", code);
    let options = MinifyOptions::default().with_source_map(SourceMapOptions::default());
    let (_, raw) = compile_with_map(&minified, &options);
    assert!(raw.sources_content.is_none());
    assert_eq!(raw.sources, vec!["?"]);
}

#[test]
fn test_positions_round_trip() {
    let options = options_with_map(Some("ahoy.js"), SourceMapOptions::default());
    let MinifyOutput { map, .. } = minify(SOURCE, &options).unwrap();
    let consumer = SourceMapConsumer::from_json(&map.unwrap()).unwrap();

    for (line, column) in [(1, 9), (2, 11)] {
        let generated = consumer.generated_position_for("ahoy.js", line, column).unwrap();
        let original = consumer
            .original_position_for(generated.line, generated.column)
            .unwrap();
        assert_eq!((original.line, original.column), (line, column));
    }
}

#[test]
fn test_columns_count_utf16_units() {
    let mut options = options_with_map(Some("wide.js"), SourceMapOptions::default());
    options.compress = None;
    options.mangle = None;
    let MinifyOutput { code, map } = minify("x = \"😀\", y = z;", &options).unwrap();
    assert_eq!(code, "x=\"😀\",y=z;");
    let consumer = SourceMapConsumer::from_json(&map.unwrap()).unwrap();

    let generated = consumer.generated_position_for("wide.js", 1, 10).unwrap();
    assert_eq!((generated.line, generated.column), (1, 7));
    let original = consumer.original_position_for(1, 7).unwrap();
    assert_eq!((original.line, original.column), (1, 10));
}
