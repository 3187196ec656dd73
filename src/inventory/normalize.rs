//! Friendly-name normalization for decoded counter-store identifiers.
//!
//! Decoded identifiers come in a few shapes:
//!
//! | Raw identifier | Friendly name |
//! |----------------|---------------|
//! | `C:\Windows\System32\notepad.exe` | `notepad` |
//! | `{6D809377-...}\7-Zip\7zFM.exe` | `7zFM` |
//! | `Microsoft.WindowsCalculator_8wekyb3d8bbwe!App` | `App` |
//! | `UEME_CTLSESSION` | `UEME_CTLSESSION` |

/// Separator between a packaged-app family and its application id.
const PACKAGE_DELIMITER: char = '!';

/// Executable suffix stripped from the end of a name.
const EXECUTABLE_SUFFIX: &str = ".exe";

/// Marks an identifier as a file-system path.
const PATH_MARKER: char = '\\';

/// Component separators once an identifier is known to be a path.
const PATH_SEPARATORS: [char; 2] = ['\\', '/'];

/// Maps a raw decoded identifier to its display name.
///
/// Steps, each applied only when its pattern matches:
/// 1. trim surrounding whitespace
/// 2. reduce a path (anything containing `\`) to its final component
/// 3. take the non-blank segment after the last `!`
/// 4. strip a trailing `.exe` (any case)
///
/// The result may be empty for degenerate input such as `".exe"`.
pub fn normalize_name(raw: &str) -> String {
    let mut name = raw.trim();

    if name.contains(PATH_MARKER) {
        if let Some(base) = name.rsplit(PATH_SEPARATORS).next() {
            name = base;
        }
    }

    if name.contains(PACKAGE_DELIMITER) {
        if let Some(last) = name.rsplit(PACKAGE_DELIMITER).next() {
            let last = last.trim();
            if !last.is_empty() {
                name = last;
            }
        }
    }

    strip_executable_suffix(name).to_string()
}

fn strip_executable_suffix(name: &str) -> &str {
    let Some(split_at) = name.len().checked_sub(EXECUTABLE_SUFFIX.len()) else {
        return name;
    };

    // `get` returns None when `split_at` falls inside a multi-byte character.
    match name.get(split_at..) {
        Some(suffix) if suffix.eq_ignore_ascii_case(EXECUTABLE_SUFFIX) => &name[..split_at],
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_windows_path() {
        assert_eq!(normalize_name("C:\\Apps\\Foo.EXE"), "Foo");
        assert_eq!(
            normalize_name("C:\\Windows\\System32\\notepad.exe"),
            "notepad"
        );
    }

    #[test]
    fn test_normalize_known_folder_path() {
        assert_eq!(
            normalize_name("{6D809377-6AF0-444B-8957-A3773F02200E}\\7-Zip\\7zFM.exe"),
            "7zFM"
        );
    }

    #[test]
    fn test_normalize_forward_slash_only_is_not_a_path() {
        assert_eq!(
            normalize_name("https://example.com/tools/app.exe"),
            "https://example.com/tools/app"
        );
        assert_eq!(normalize_name("C:/Tools/putty.exe"), "C:/Tools/putty");
    }

    #[test]
    fn test_normalize_mixed_separators_split_on_both() {
        assert_eq!(normalize_name("C:\\Tools/bin/putty.exe"), "putty");
    }

    #[test]
    fn test_normalize_packaged_app() {
        assert_eq!(normalize_name("Package!Sub!MainApp"), "MainApp");
        assert_eq!(
            normalize_name("Microsoft.WindowsCalculator_8wekyb3d8bbwe!App"),
            "App"
        );
        assert_eq!(normalize_name("Tool!Helper.exe"), "Helper");
    }

    #[test]
    fn test_normalize_blank_packaged_segment_keeps_value() {
        assert_eq!(normalize_name("Package!   !"), "Package!   !");
        assert_eq!(normalize_name("Package!"), "Package!");
    }

    #[test]
    fn test_normalize_trims_segment_after_delimiter() {
        assert_eq!(normalize_name("Family!  Viewer  "), "Viewer");
    }

    #[test]
    fn test_normalize_trims_input() {
        assert_eq!(normalize_name("  notepad.exe  "), "notepad");
        assert_eq!(normalize_name("\tUEME_CTLSESSION\n"), "UEME_CTLSESSION");
    }

    #[test]
    fn test_normalize_strips_only_trailing_exe() {
        assert_eq!(normalize_name("setup.exe.bak"), "setup.exe.bak");
        assert_eq!(normalize_name("game.ExE"), "game");
        assert_eq!(normalize_name("exe"), "exe");
    }

    #[test]
    fn test_normalize_degenerate_inputs() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("   "), "");
        assert_eq!(normalize_name(".exe"), "");
        assert_eq!(normalize_name("C:\\Apps\\"), "");
    }

    #[test]
    fn test_normalize_multibyte_suffix_boundary() {
        assert_eq!(normalize_name("日本語"), "日本語");
        assert_eq!(normalize_name("ツール.exe"), "ツール");
    }
}
