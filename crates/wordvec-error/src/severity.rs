/// How the binary reports an [`crate::Error`].
///
/// Unsatisfiable requests (wrong dimensionality, unknown model type, bad counts), missing
/// resource files and unreadable configuration are `Fatal`: rerunning with the same inputs cannot
/// succeed. Corrupt or unreadable files and trainer failures are `Error`. Nothing currently maps
/// to `Warning`; dropped corpus tokens are logged directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}
