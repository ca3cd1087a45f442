//! Reduce a command line to the flag names it uses.

/// Arguments starting with this character are treated as flags.
pub const FLAG_PREFIX: char = '-';

/// Return the names of all flags in `args`, dropping any `=value` part.
///
/// Positional arguments are removed entirely so that user-supplied values
/// (image names, paths, tokens) are never reported. Order is preserved.
pub fn extract_flags<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .filter_map(|arg| {
            let arg = arg.as_ref();
            if !arg.starts_with(FLAG_PREFIX) {
                return None;
            }
            let name = arg.split_once('=').map_or(arg, |(name, _)| name);
            Some(name.to_owned())
        })
        .collect()
}
