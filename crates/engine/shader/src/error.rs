//! Error types for shader compilation and linking

use crate::stage::ShaderStage;

/// Listing of one stage attached to a program that failed to link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageListing {
    pub stage: ShaderStage,
    pub listing: String,
}

/// Errors that can occur while building a shader program
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    /// The context could not allocate a shader or program object
    #[error("failed to create {object} object for '{name}': {message}")]
    Create {
        name: String,
        object: &'static str,
        message: String,
    },

    /// A stage failed to compile
    #[error("shader '{name}' ({stage}) failed to compile:\n{log}")]
    Compile {
        name: String,
        stage: ShaderStage,
        log: String,
        /// Numbered header + body, as compiled
        listing: String,
    },

    /// The compiled stages failed to link
    #[error("program '{name}' failed to link:\n{log}")]
    Link {
        name: String,
        log: String,
        stages: Vec<StageListing>,
    },
}

/// Result type for shader operations
pub type Result<T> = std::result::Result<T, ShaderError>;

impl ShaderError {
    /// Name of the program the failure belongs to
    pub fn name(&self) -> &str {
        match self {
            Self::Create { name, .. } | Self::Compile { name, .. } | Self::Link { name, .. } => name,
        }
    }

    /// Raw driver log, if the failure produced one
    pub fn log(&self) -> Option<&str> {
        match self {
            Self::Create { .. } => None,
            Self::Compile { log, .. } | Self::Link { log, .. } => Some(log),
        }
    }

    /// Full diagnostic text: the driver log followed by numbered listings
    /// of every stage involved.
    pub fn report(&self) -> String {
        match self {
            Self::Create { .. } => self.to_string(),
            Self::Compile {
                name,
                stage,
                log,
                listing,
            } => {
                let mut out = format!("Error in '{}'({}):\n", name, stage);
                push_line(&mut out, log);
                out.push_str(listing);
                out
            }
            Self::Link { log, stages, .. } => {
                let mut out = String::new();
                push_line(&mut out, log);
                for stage in stages {
                    out.push_str(&format!("shader:{}:\n", stage.stage));
                    out.push_str(&stage.listing);
                }
                out
            }
        }
    }
}

fn push_line(out: &mut String, text: &str) {
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
}

/// Print the full report to stdout and panic.
///
/// For development builds where a broken shader should stop the program
/// with everything needed to fix it on screen.
pub fn abort_with_report(err: &ShaderError) -> ! {
    println!("{}", err.report());
    panic!("shader program '{}' could not be built", err.name());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_report_layout() {
        let err = ShaderError::Compile {
            name: "prog".to_string(),
            stage: ShaderStage::Vertex,
            log: "ERROR: 0:4: 'foo' : undeclared identifier\n".to_string(),
            listing: "   1| #version 300 es\n".to_string(),
        };

        assert_eq!(
            err.report(),
            "Error in 'prog'(VERT):\nERROR: 0:4: 'foo' : undeclared identifier\n   1| #version 300 es\n"
        );
    }

    #[test]
    fn test_compile_report_adds_missing_newline() {
        let err = ShaderError::Compile {
            name: "prog".to_string(),
            stage: ShaderStage::Fragment,
            log: "bad".to_string(),
            listing: "   1| x\n".to_string(),
        };
        assert!(err.report().contains("bad\n   1| x\n"));
    }

    #[test]
    fn test_link_report_lists_every_stage() {
        let err = ShaderError::Link {
            name: "prog".to_string(),
            log: "varying v_tc not written".to_string(),
            stages: vec![
                StageListing {
                    stage: ShaderStage::Vertex,
                    listing: "   1| a\n".to_string(),
                },
                StageListing {
                    stage: ShaderStage::Fragment,
                    listing: "   1| b\n".to_string(),
                },
            ],
        };

        assert_eq!(
            err.report(),
            "varying v_tc not written\nshader:VERT:\n   1| a\nshader:FRAG:\n   1| b\n"
        );
        assert_eq!(err.log(), Some("varying v_tc not written"));
    }

    #[test]
    fn test_create_error_has_no_log() {
        let err = ShaderError::Create {
            name: "prog".to_string(),
            object: "program",
            message: "context lost".to_string(),
        };
        assert_eq!(err.name(), "prog");
        assert_eq!(err.log(), None);
        assert_eq!(err.report(), "failed to create program object for 'prog': context lost");
    }

    #[test]
    #[should_panic(expected = "shader program 'prog' could not be built")]
    fn test_abort_with_report_panics() {
        let err = ShaderError::Link {
            name: "prog".to_string(),
            log: "link failed".to_string(),
            stages: Vec::new(),
        };
        abort_with_report(&err);
    }
}
