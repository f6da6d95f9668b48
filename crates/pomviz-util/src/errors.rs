use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all pomviz operations.
#[derive(Debug, Error, Diagnostic)]
pub enum PomvizError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid configuration.
    #[error("Configuration error: {message}")]
    #[diagnostic(help(
        "Pass the value on the command line or set it in the config file \
         (repository_url, package_name, output_file_path, graphviz_program_path)"
    ))]
    Config { message: String },

    /// A manifest (POM) is not well-formed XML.
    #[error("Manifest parse error: {message}")]
    Parse { message: String },

    /// Network request or file fetch failed.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The traversal finished without a single edge.
    #[error("No dependency graph could be built for {root}")]
    #[diagnostic(help(
        "The package has no resolvable dependencies, or its manifest could not be fetched or parsed"
    ))]
    EmptyGraph { root: String },

    /// The external graph renderer failed.
    #[error("Rendering failed: {message}")]
    #[diagnostic(help("Check that graphviz_program_path points to a working `dot` executable"))]
    Render { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}
