//! Page-side scripts, run through `Runtime.callFunctionOn` with `this`
//! bound to `window`.
//!
//! The snapshot script keeps element handles in `window.__personafillNodes`,
//! indexed by snapshot node id, so later probes and writes can address the
//! same elements.

/// Serializes the document into a `PageSnapshot`.
pub const COLLECT_SNAPSHOT: &str = include_str!("scripts/collect_snapshot.js");

/// Reports whether a node still holds no value.
pub const READ_VALUE: &str = include_str!("scripts/read_value.js");

/// Applies one `WritePlan`.
pub const APPLY_WRITE: &str = include_str!("scripts/apply_write.js");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_are_function_declarations() {
        for script in [COLLECT_SNAPSHOT, READ_VALUE, APPLY_WRITE] {
            assert!(script.trim_start().starts_with("function"));
        }
    }

    #[test]
    fn test_write_uses_native_setter() {
        assert!(APPLY_WRITE.contains("Object.getOwnPropertyDescriptor"));
        assert!(APPLY_WRITE.contains("window[action.setter]"));
        assert!(APPLY_WRITE.contains("bubbles: true, cancelable: true"));
        assert!(COLLECT_SNAPSHOT.contains("__personafillNodes"));
    }
}
