/// String hash command.
pub mod hash;
/// Schema-less node inspection command.
pub mod inspect;
/// Decimal and rational parsing commands.
pub mod numeric;
/// Indented node tree rendering.
pub mod print;
/// Shared CLI helpers.
pub mod util;

#[cfg(test)]
mod test_support;
