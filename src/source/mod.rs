pub mod memory;
pub mod reader;

/// Which kind of data a dump reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Logical (CPU-visible) memory.
    Logical,
    /// Physical memory.
    Physical,
    /// A file, addressed by byte offset.
    File,
}
