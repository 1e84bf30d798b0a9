//! Expression language backends
//!
//! Expressions are routed by language id to one of three backend roles:
//! - the FEEL engine, evaluated directly from source
//! - the template (EL) provider, whose compiled expressions are cached per node
//! - script engines, compiled once per node when the engine supports it

mod dispatcher;
mod feel;
mod script;
mod template;

pub use dispatcher::ExpressionDispatcher;
pub use feel::{DefaultFeelEngine, FeelEngine};
pub use script::{
    CompiledScript, DefaultScriptEngineResolver, ScriptEngine, ScriptEngineResolver,
};
pub use template::{ElExpression, ElProvider, TemplateElProvider};

/// Language id of the FEEL backend
pub const FEEL_LANGUAGE: &str = "feel";

/// Language id of the template backend
pub const TEMPLATE_LANGUAGE: &str = "juel";

/// FEEL namespaces of the DMN 1.1 to 1.5 model versions
pub const FEEL_NAMESPACES: &[&str] = &[
    "http://www.omg.org/spec/FEEL/20140401",
    "http://www.omg.org/spec/DMN/20180521/FEEL/",
    "https://www.omg.org/spec/DMN/20191111/FEEL/",
    "https://www.omg.org/spec/DMN/20211108/FEEL/",
    "https://www.omg.org/spec/DMN/20230324/FEEL/",
];

/// Backend role a language id resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionLanguage<'a> {
    Feel,
    Template,
    Script(&'a str),
}

impl<'a> ExpressionLanguage<'a> {
    /// Resolve a language id; ids are compared case-insensitively
    pub fn resolve(language: &'a str) -> Self {
        let language = language.trim();
        if is_feel_language(language) {
            ExpressionLanguage::Feel
        } else if language.eq_ignore_ascii_case(TEMPLATE_LANGUAGE) {
            ExpressionLanguage::Template
        } else {
            ExpressionLanguage::Script(language)
        }
    }
}

/// True for `feel` and the FEEL namespace URIs
pub fn is_feel_language(language: &str) -> bool {
    let language = language.trim();
    language.eq_ignore_ascii_case(FEEL_LANGUAGE)
        || FEEL_NAMESPACES
            .iter()
            .any(|namespace| language.eq_ignore_ascii_case(namespace))
}
