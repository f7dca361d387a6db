// build.rs

//! Compiles `locales/*.toml` into the `t!` macro.
//!
//! English is always loaded and is the source of truth for the key set. The
//! selected language only overrides values, so a half-finished translation
//! still builds and falls back to English per key.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

type Table = BTreeMap<String, String>;

const LOCALES_DIR: &str = "locales";
const BASE_LANG: &str = "en";
const LANG_ENV: &str = "SCRIPTDECK_LANG";

fn main() {
    println!("cargo:rerun-if-env-changed={}", LANG_ENV);
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed={}/", LOCALES_DIR);

    let lang = selected_language();

    let mut table = read_table(BASE_LANG)
        .unwrap_or_else(|| panic!("{}/{}.toml is required", LOCALES_DIR, BASE_LANG));
    if lang != BASE_LANG {
        match read_table(&lang) {
            Some(overrides) => merge_overrides(&mut table, overrides, &lang),
            None => println!(
                "cargo:warning=No {}/{}.toml; using English strings.",
                LOCALES_DIR, lang
            ),
        }
    }

    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    fs::write(Path::new(&out_dir).join("translations.rs"), render_macro(&table))
        .expect("failed to write translations.rs");
}

/// A `lang_*` feature wins over the environment variable.
fn selected_language() -> String {
    let mut features: Vec<String> = env::vars()
        .filter_map(|(key, _)| {
            key.strip_prefix("CARGO_FEATURE_LANG_")
                .map(str::to_lowercase)
        })
        .collect();
    features.sort();

    match features.split_first() {
        Some((first, rest)) => {
            if !rest.is_empty() {
                println!(
                    "cargo:warning=Several language features enabled ({:?}); building with '{}'.",
                    features, first
                );
            }
            first.clone()
        }
        None => env::var(LANG_ENV).unwrap_or_else(|_| BASE_LANG.to_string()),
    }
}

/// `None` when the file does not exist. A file that exists but does not parse
/// stops the build.
fn read_table(lang: &str) -> Option<Table> {
    let path = format!("{}/{}.toml", LOCALES_DIR, lang);
    let content = fs::read_to_string(&path).ok()?;
    let table = toml::from_str(&content).unwrap_or_else(|e| panic!("{} is invalid: {}", path, e));
    Some(table)
}

fn merge_overrides(table: &mut Table, overrides: Table, lang: &str) {
    for (key, value) in overrides {
        if !table.contains_key(&key) {
            // Left behind after a key was renamed or removed in English.
            println!(
                "cargo:warning={}.toml has key '{}' that {}.toml does not; ignoring it.",
                lang, key, BASE_LANG
            );
            continue;
        }
        table.insert(key, value);
    }
}

fn render_macro(table: &Table) -> String {
    let mut code = String::from("#[macro_export]\nmacro_rules! t {\n");
    for (key, value) in table {
        code.push_str(&format!(
            "    ({}) => {{ {} }};\n",
            string_literal(key),
            string_literal(value)
        ));
    }
    code.push_str(
        "    ($key:expr) => {{ compile_error!(concat!(\"Missing translation key: \", $key)) }};\n",
    );
    code.push('}');
    code
}

fn string_literal(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}
