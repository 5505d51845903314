//! Derived download URL for descriptors that omit one

use reqwest::Url;

/// A source-hosting platform and the host serving its raw file contents
struct KnownHost {
    raw_host: &'static str,
    platform_host: &'static str,
}

const KNOWN_HOSTS: &[KnownHost] = &[KnownHost {
    raw_host: "raw.githubusercontent.com",
    platform_host: "github.com",
}];

/// Guess the release asset URL for `version` from the check URL.
///
/// `https://raw.githubusercontent.com/<user>/<repo>/<ref>/...` and
/// `https://github.com/<user>/<repo>/...` both become
/// `https://github.com/<user>/<repo>/releases/download/v<version>/<repo>.zip`.
/// Anything else returns the check URL unchanged.
pub fn derive_download_url(check_url: &str, version: &str) -> String {
    release_asset_url(check_url, version).unwrap_or_else(|| check_url.to_string())
}

fn release_asset_url(check_url: &str, version: &str) -> Option<String> {
    let url = Url::parse(check_url).ok()?;
    let full_host = url.host_str()?.to_lowercase();
    let host = full_host.strip_prefix("www.").unwrap_or(&full_host);

    let known = KNOWN_HOSTS
        .iter()
        .find(|known| host == known.raw_host || host == known.platform_host)?;

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let user = segments.next()?;
    let repo = segments.next()?.trim_end_matches(".git");
    if repo.is_empty() {
        return None;
    }
    // Raw URLs always carry a ref and a file path after <user>/<repo>
    if host == known.raw_host && segments.next().is_none() {
        return None;
    }

    let version = version.trim().trim_start_matches(['v', 'V']);
    Some(format!(
        "https://{}/{}/{}/releases/download/v{}/{}.zip",
        known.platform_host, user, repo, version, repo
    ))
}
