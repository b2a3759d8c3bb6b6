//! Supported-language table.
//!
//! A fixed, statically configured set: each entry names the conventional
//! source file and the shell command that builds and runs it inside the
//! workspace directory. Adding a language means adding one entry here.

/// Build/run configuration for one supported language
#[derive(Debug, Clone, Copy)]
pub struct LanguageSpec {
    /// Language tag as sent by clients (e.g., "javascript")
    pub tag: &'static str,
    /// Source file name inside the workspace, with the conventional extension
    pub file_name: &'static str,
    /// Shell command executed with the workspace directory as cwd
    pub command: &'static str,
}

/// The closed set of supported languages
pub const SUPPORTED_LANGUAGES: &[LanguageSpec] = &[
    LanguageSpec {
        tag: "javascript",
        file_name: "main.js",
        command: "node main.js",
    },
    LanguageSpec {
        tag: "python",
        file_name: "main.py",
        command: "python3 main.py",
    },
    LanguageSpec {
        tag: "cpp",
        file_name: "main.cpp",
        command: "g++ main.cpp -o main && ./main",
    },
    LanguageSpec {
        tag: "java",
        file_name: "Main.java",
        command: "javac Main.java && java Main",
    },
];

/// Look up a language tag in the static table
pub fn lookup(tag: &str) -> Option<&'static LanguageSpec> {
    SUPPORTED_LANGUAGES.iter().find(|spec| spec.tag == tag)
}
