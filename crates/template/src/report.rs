//! Non-fatal findings collected while assembling a document.
use std::fmt;
use stencil_types::LoopKind;

/// Something the engine silently worked around. Assembly still succeeds;
/// callers may surface these as warnings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyWarning {
    /// A loop hit its iteration ceiling and was cut short.
    LoopTruncated {
        element_id: String,
        kind: LoopKind,
        ceiling: usize,
    },
    /// A `foreach` data source did not resolve to an array.
    ForeachSourceNotArray {
        element_id: String,
        data_source: String,
    },
    /// The element's loop definition was unreadable; no instances were generated.
    UnknownLoop { element_id: String },
}

impl fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyWarning::LoopTruncated {
                element_id,
                kind,
                ceiling,
            } => write!(
                f,
                "{} loop on element '{}' truncated at {} iterations",
                kind, element_id, ceiling
            ),
            AssemblyWarning::ForeachSourceNotArray {
                element_id,
                data_source,
            } => write!(
                f,
                "foreach source '{}' on element '{}' is not an array",
                data_source, element_id
            ),
            AssemblyWarning::UnknownLoop { element_id } => write!(
                f,
                "element '{}' has an unrecognised loop definition and was skipped",
                element_id
            ),
        }
    }
}

/// Collects warnings for one assembly pass and mirrors each to the log.
#[derive(Debug, Default)]
pub struct Warnings {
    items: Vec<AssemblyWarning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: AssemblyWarning) {
        log::warn!("{}", warning);
        self.items.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_vec(self) -> Vec<AssemblyWarning> {
        self.items
    }
}
