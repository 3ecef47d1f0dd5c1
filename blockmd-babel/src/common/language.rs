//! Mapping between the platform's numeric code-block languages and fence tags.

use crate::ir::nodes::CodeLanguage;

/// Fence tag for each platform language code, indexed by `code - 1`.
/// Code 1 is plain text, which has no fence tag.
const LANGUAGES: &[&str] = &[
    "",
    "abap",
    "ada",
    "apache",
    "apex",
    "assembly",
    "bash",
    "csharp",
    "cpp",
    "c",
    "cobol",
    "css",
    "coffeescript",
    "d",
    "dart",
    "delphi",
    "django",
    "dockerfile",
    "erlang",
    "fortran",
    "foxpro",
    "go",
    "groovy",
    "html",
    "htmlbars",
    "http",
    "haskell",
    "json",
    "java",
    "javascript",
    "julia",
    "kotlin",
    "latex",
    "lisp",
    "logo",
    "lua",
    "matlab",
    "makefile",
    "markdown",
    "nginx",
    "objectivec",
    "openedgeabl",
    "php",
    "perl",
    "postscript",
    "powershell",
    "prolog",
    "protobuf",
    "python",
    "r",
    "rpg",
    "ruby",
    "rust",
    "sas",
    "scss",
    "sql",
    "scala",
    "scheme",
    "scratch",
    "shell",
    "swift",
    "thrift",
    "typescript",
    "vbscript",
    "vbnet",
    "xml",
    "yaml",
    "cmake",
    "diff",
    "gherkin",
    "graphql",
    "glsl",
    "properties",
    "solidity",
    "toml",
];

const ALIASES: &[(&str, &str)] = &[
    ("c#", "csharp"),
    ("c++", "cpp"),
    ("golang", "go"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("md", "markdown"),
    ("objc", "objectivec"),
    ("objective-c", "objectivec"),
    ("ps1", "powershell"),
    ("py", "python"),
    ("rb", "ruby"),
    ("rs", "rust"),
    ("sh", "shell"),
    ("text", ""),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("yml", "yaml"),
    ("zsh", "shell"),
];

/// Fence tag for a code block language. Unknown codes give an empty tag.
pub fn fence_tag(language: Option<&CodeLanguage>) -> &str {
    match language {
        None => "",
        Some(CodeLanguage::Name(name)) => name.as_str(),
        Some(CodeLanguage::Code(code)) => code
            .checked_sub(1)
            .and_then(|i| LANGUAGES.get(i as usize))
            .copied()
            .unwrap_or(""),
    }
}

/// Platform code for a fence tag, if the platform knows the language.
pub fn language_code(tag: &str) -> Option<u32> {
    let tag = tag.trim().to_ascii_lowercase();
    if tag.is_empty() {
        return None;
    }
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| *alias == tag)
        .map_or(tag.as_str(), |(_, name)| *name);
    LANGUAGES
        .iter()
        .position(|name| *name == canonical)
        .map(|i| i as u32 + 1)
}
