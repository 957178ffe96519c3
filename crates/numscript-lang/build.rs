use std::path::PathBuf;

use numscript_grammar::Grammar;

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR not set");
    let grammar_path = PathBuf::from(&manifest_dir).join("grammar.json");

    let json = std::fs::read_to_string(&grammar_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", grammar_path.display()));
    let grammar = Grammar::from_json(&json).unwrap_or_else(|e| panic!("invalid grammar.json: {e}"));
    let generated =
        numscript_generate::generate(&grammar).unwrap_or_else(|e| panic!("failed to generate tables: {e}"));

    for conflict in generated.conflicts.unexpected() {
        println!(
            "cargo::warning=undeclared conflict in state {} on {:?} among [{}]",
            conflict.state.0,
            conflict.lookahead,
            conflict.symbols.join(", ")
        );
    }

    let bytes = numscript_tables::encode(&generated.data).expect("failed to encode tables");
    let tables_path = PathBuf::from(out_dir).join("numscript.tables");
    std::fs::write(&tables_path, bytes)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", tables_path.display()));

    println!("cargo::rerun-if-changed=grammar.json");
    println!("cargo::rerun-if-changed=build.rs");
}
