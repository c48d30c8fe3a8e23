//! End-to-end bundling behavior through the public API.

use tubundle::{
    bundle_to_single_unit, parse_request, prepare_payload, BundleOptions, Lang, SourceFile,
};

fn bundle(lang: Lang, files: &[SourceFile]) -> String {
    bundle_to_single_unit(lang, files, &BundleOptions::default()).output.content
}

#[test]
fn header_from_two_sources_is_inlined_once() {
    let files = vec![
        SourceFile::new("vec.h", "struct Vec { float x, y; };\n"),
        SourceFile::new("physics.cpp", "#include \"vec.h\"\nVec step(Vec v) { return v; }\n"),
        SourceFile::new("render.cpp", "#include \"vec.h\"\nvoid draw(Vec) {}\n"),
        SourceFile::new("main.cpp", "#include \"vec.h\"\nint main() { return 0; }\n"),
    ];
    let out = bundle(Lang::Cpp, &files);
    assert_eq!(out.matches("struct Vec { float x, y; };").count(), 1);
    assert_eq!(out.matches("/* skipped duplicate include \"vec.h\" */").count(), 2);
    assert_eq!(out.matches("// === begin include vec.h ===").count(), 1);
}

#[test]
fn mutual_includes_terminate() {
    let files = vec![
        SourceFile::new("a.h", "#pragma once\n#include \"b.h\"\nstruct A;\n"),
        SourceFile::new("b.h", "#pragma once\n#include \"a.h\"\nstruct B;\n"),
        SourceFile::new("main.cpp", "#include \"a.h\"\nint main() {}\n"),
    ];
    let out = bundle(Lang::Cpp, &files);
    assert!(out.contains("/* skipped recursive include \"a.h\" */"));
    assert_eq!(out.matches("struct A;").count(), 1);
    assert_eq!(out.matches("struct B;").count(), 1);
}

#[test]
fn long_include_chain_stops_at_depth_limit() {
    let mut files: Vec<SourceFile> = (1..=40)
        .map(|i| SourceFile::new(format!("h{i}.h"), format!("#include \"h{}.h\"\nint v{i};\n", i + 1)))
        .collect();
    files.push(SourceFile::new("main.c", "#include \"h1.h\"\nint main(void) { return 0; }\n"));

    let b = bundle_to_single_unit(Lang::C, &files, &BundleOptions::default());
    let out = &b.output.content;
    assert!(out.contains("/* include depth limit exceeded at h33.h */"));
    // h33 is left verbatim, so its own include of h34 stays a directive
    assert!(out.contains("#include \"h34.h\""));
    assert!(!out.contains("// === begin include h34.h ==="));
    assert_eq!(b.stats.expansion.depth_limited, vec!["h33.h"]);
}

#[test]
fn smaller_depth_ceiling_is_honored() {
    let files = vec![
        SourceFile::new("a.h", "#include \"b.h\"\n"),
        SourceFile::new("b.h", "#include \"c.h\"\n"),
        SourceFile::new("c.h", "int c;\n"),
        SourceFile::new("main.c", "#include \"a.h\"\n"),
    ];
    let b = bundle_to_single_unit(Lang::C, &files, &BundleOptions { max_depth: 1 });
    assert!(b.output.content.contains("/* include depth limit exceeded at b.h */"));
}

#[test]
fn secondary_sources_precede_entry() {
    let files = vec![
        SourceFile::new("util.cpp", "int util() { return 1; }\n"),
        SourceFile::new("main.cpp", "int util();\nint main() { return util(); }\n"),
    ];
    let b = bundle_to_single_unit(Lang::Cpp, &files, &BundleOptions::default());
    assert_eq!(b.output.name, "main.cpp");
    let out = &b.output.content;
    assert!(out.starts_with("#line 1 \"util.cpp\"\n"));
    assert!(out.find("int util() {").unwrap() < out.find("#line 1 \"main.cpp\"").unwrap());
}

#[test]
fn missing_include_line_is_kept() {
    let files = vec![
        SourceFile::new("a.cpp", "#include \"missing.h\"\nint main() {}\n"),
        SourceFile::new("b.cpp", "int b;\n"),
    ];
    let out = bundle(Lang::Cpp, &files);
    assert!(out.contains("\n#include \"missing.h\"\n"));
}

#[test]
fn pragma_once_never_survives_inlining() {
    let files = vec![
        SourceFile::new("inc/guard.hpp", "#pragma once\n#  pragma   ONCE\nint g;\n"),
        SourceFile::new("main.cpp", "#include \"inc/guard.hpp\"\nint main() { return g; }\n"),
    ];
    let out = bundle(Lang::Cpp, &files);
    assert!(!out.to_lowercase().contains("pragma"));
    assert!(out.contains("#line 1 \"inc/guard.hpp\"\n\n\nint g;\n"));
}

#[test]
fn nested_include_restores_origin_line() {
    let files = vec![
        SourceFile::new("a.h", "// a\n#include \"b.h\"\nint a;\n"),
        SourceFile::new("b.h", "int b;\n"),
        SourceFile::new("main.c", "int x;\n#include \"a.h\"\nint main(void) { return 0; }\n"),
    ];
    let out = bundle(Lang::C, &files);
    assert!(out.contains("// === end include b.h ===\n#line 3 \"a.h\"\nint a;\n"));
    assert!(out.contains("// === end include a.h ===\n#line 3 \"main.c\"\nint main(void)"));
}

#[test]
fn single_file_and_foreign_language_pass_through() {
    let one = r##"{"language":"cpp","files":[{"name":"solo.cpp","content":"#include \"x.h\"\nint main(){}"}]}"##;
    let p = prepare_payload(parse_request(one).unwrap(), &BundleOptions::default());
    assert_eq!(p.payload.files.len(), 1);
    assert_eq!(p.payload.files[0].name, "solo.cpp");
    assert_eq!(p.payload.files[0].content, "#include \"x.h\"\nint main(){}");

    let java = r#"{"language":"java","files":[{"name":"A.java","content":"a"},{"name":"B.java","content":"b"}]}"#;
    let p = prepare_payload(parse_request(java).unwrap(), &BundleOptions::default());
    assert_eq!(p.payload.files.len(), 2);
    assert!(p.stats.is_none());
}

#[test]
fn headers_only_submission_still_produces_a_unit() {
    let files = vec![SourceFile::new("a.h", "int a;"), SourceFile::new("b.h", "int b;")];
    let b = bundle_to_single_unit(Lang::C, &files, &BundleOptions::default());
    assert_eq!(b.output.name, "main.c");
    assert!(b.output.content.contains("// --- a.h ---\nint a;\n"));
    assert!(b.output.content.contains("// --- b.h ---\nint b;\n"));
}

#[test]
fn caller_buffers_are_not_modified() {
    let files = vec![
        SourceFile::new("a.h", "#pragma once\nint a;\n"),
        SourceFile::new("main.c", "#include \"a.h\"\nint main(void){return a;}\n"),
    ];
    let before = files.clone();
    let _ = bundle(Lang::C, &files);
    assert_eq!(files, before);
}
