use super::ConversionMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Convert {
        request: u64,
        mode: ConversionMode,
        input: String,
    },
    CopyResult,
    OpenResult,
    PersistTheme(String),
}
