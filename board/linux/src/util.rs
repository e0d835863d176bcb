use std::env;
use std::path::PathBuf;

/// Replace a leading `~` with the user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    expand_with(path, env::var_os("HOME").map(PathBuf::from))
}

fn expand_with(path: &str, home: Option<PathBuf>) -> PathBuf {
    match (path.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) if rest.starts_with('/') => home.join(&rest[1..]),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expands_leading_tilde() {
        let home = Some(PathBuf::from("/home/pi"));
        assert_eq!(
            expand_with("~/.minimu9-ahrs-cal", home.clone()),
            PathBuf::from("/home/pi/.minimu9-ahrs-cal")
        );
        assert_eq!(expand_with("~", home), PathBuf::from("/home/pi"));
    }

    #[test]
    fn test_leaves_other_paths_alone() {
        let home = Some(PathBuf::from("/home/pi"));
        assert_eq!(expand_with("/etc/cal", home.clone()), PathBuf::from("/etc/cal"));
        assert_eq!(expand_with("~other/cal", home), PathBuf::from("~other/cal"));
        assert_eq!(expand_with("~/cal", None), PathBuf::from("~/cal"));
    }
}
