use std::io::Write;
use std::process::{Command, Stdio};

// ---------------------------------------------------------------------------
// Download links
// ---------------------------------------------------------------------------

/// Turn a record's download link into an absolute URL.
///
/// Catalogs often list links relative to the file they are served from, so
/// relative links are joined onto the endpoint.
pub fn resolve_download_url(endpoint: &str, link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }
    if let Ok(abs) = reqwest::Url::parse(link) {
        return Some(abs.to_string());
    }
    let base = reqwest::Url::parse(endpoint).ok()?;
    base.join(link).ok().map(|u| u.to_string())
}

// ---------------------------------------------------------------------------
// Clipboard operations
// ---------------------------------------------------------------------------

fn pipe_into(program: &str, args: &[&str], text: &str) -> std::io::Result<std::process::ExitStatus> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .spawn()?;
    if let Some(stdin) = child.stdin.as_mut() {
        stdin.write_all(text.as_bytes())?;
    }
    child.wait()
}

/// Copy text to the system clipboard.
pub(crate) fn copy_to_clipboard(text: &str) -> Result<(), String> {
    let result = if cfg!(target_os = "macos") {
        pipe_into("pbcopy", &[], text)
    } else if cfg!(target_os = "linux") {
        // Wayland first, then the two common X11 tools.
        pipe_into("wl-copy", &[], text)
            .or_else(|_| pipe_into("xclip", &["-selection", "clipboard"], text))
            .or_else(|_| pipe_into("xsel", &["--clipboard", "--input"], text))
    } else {
        return Err("Clipboard not supported on this platform".to_owned());
    };

    match result {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(format!("Clipboard command exited with {status}")),
        Err(e) => Err(format!("Failed to run clipboard command: {e}")),
    }
}

// ---------------------------------------------------------------------------
// Open in browser
// ---------------------------------------------------------------------------

/// Open a URL in the default browser.
pub(crate) fn open_in_browser(url: &str) -> Result<(), String> {
    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).status()
    } else if cfg!(target_os = "linux") {
        Command::new("xdg-open")
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
    } else {
        return Err("Browser open not supported on this platform".to_owned());
    };

    match result {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(format!("Browser command exited with {status}")),
        Err(e) => Err(format!("Failed to open browser: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://updates.example.com/fw/signatures.json";

    #[test]
    fn absolute_links_pass_through() {
        assert_eq!(
            resolve_download_url(ENDPOINT, "https://cdn.example.com/a.bin").as_deref(),
            Some("https://cdn.example.com/a.bin")
        );
    }

    #[test]
    fn relative_links_join_the_endpoint() {
        assert_eq!(
            resolve_download_url(ENDPOINT, "images/a.bin").as_deref(),
            Some("https://updates.example.com/fw/images/a.bin")
        );
        assert_eq!(
            resolve_download_url(ENDPOINT, "/root.bin").as_deref(),
            Some("https://updates.example.com/root.bin")
        );
    }

    #[test]
    fn blank_or_unresolvable_links() {
        assert_eq!(resolve_download_url(ENDPOINT, "  "), None);
        assert_eq!(resolve_download_url("not a url", "a.bin"), None);
    }
}
