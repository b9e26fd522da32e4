/// Escape a message for use as the data part of a runner workflow command
/// such as `::error::`.
pub fn escape_command_data(value: &str) -> String {
    value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}
