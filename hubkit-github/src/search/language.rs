//! Languages accepted by the `language:` qualifier

use std::fmt;

/// A language as GitHub's linguist names it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Language {
    Assembly,
    Bash,
    C,
    CSharp,
    Cpp,
    Clojure,
    CoffeeScript,
    CommonLisp,
    Css,
    Dart,
    Dockerfile,
    Elixir,
    EmacsLisp,
    Erlang,
    FSharp,
    Go,
    Groovy,
    Haskell,
    Html,
    Java,
    JavaScript,
    Julia,
    Kotlin,
    LiterateHaskell,
    Lua,
    Markdown,
    Nix,
    ObjectiveC,
    OCaml,
    Perl,
    Php,
    PowerShell,
    Python,
    R,
    Ruby,
    Rust,
    Scala,
    Shell,
    Swift,
    TypeScript,
    VimScript,
    VisualBasic,
    Zig,
    /// Any name not listed above, passed through as-is
    Other(String),
}

impl Language {
    pub fn as_str(&self) -> &str {
        match self {
            Language::Assembly => "Assembly",
            Language::Bash => "Bash",
            Language::C => "C",
            Language::CSharp => "C#",
            Language::Cpp => "C++",
            Language::Clojure => "Clojure",
            Language::CoffeeScript => "CoffeeScript",
            Language::CommonLisp => "Common Lisp",
            Language::Css => "CSS",
            Language::Dart => "Dart",
            Language::Dockerfile => "Dockerfile",
            Language::Elixir => "Elixir",
            Language::EmacsLisp => "Emacs Lisp",
            Language::Erlang => "Erlang",
            Language::FSharp => "F#",
            Language::Go => "Go",
            Language::Groovy => "Groovy",
            Language::Haskell => "Haskell",
            Language::Html => "HTML",
            Language::Java => "Java",
            Language::JavaScript => "JavaScript",
            Language::Julia => "Julia",
            Language::Kotlin => "Kotlin",
            Language::LiterateHaskell => "Literate Haskell",
            Language::Lua => "Lua",
            Language::Markdown => "Markdown",
            Language::Nix => "Nix",
            Language::ObjectiveC => "Objective-C",
            Language::OCaml => "OCaml",
            Language::Perl => "Perl",
            Language::Php => "PHP",
            Language::PowerShell => "PowerShell",
            Language::Python => "Python",
            Language::R => "R",
            Language::Ruby => "Ruby",
            Language::Rust => "Rust",
            Language::Scala => "Scala",
            Language::Shell => "Shell",
            Language::Swift => "Swift",
            Language::TypeScript => "TypeScript",
            Language::VimScript => "Vim Script",
            Language::VisualBasic => "Visual Basic",
            Language::Zig => "Zig",
            Language::Other(name) => name,
        }
    }

    /// Qualifier value, quoted when the name has more than one word
    pub fn qualifier_value(&self) -> String {
        let name = self.as_str();
        if name.contains(' ') {
            format!("\"{}\"", name)
        } else {
            name.to_string()
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Language {
    fn from(name: &str) -> Self {
        Language::Other(name.to_string())
    }
}
