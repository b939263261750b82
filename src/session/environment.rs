use super::ShellSession;
use std::fs;
use std::path::{Path, PathBuf};

/// Where `setup_environment` placed the Linux-like tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentLayout {
    pub root: PathBuf,
    pub home: PathBuf,
}

fn tree_dirs(user: &str) -> Vec<String> {
    [
        "bin", "etc", "tmp", "var/log", "var/tmp", "usr/bin", "usr/lib", "usr/share", "opt",
        "root",
    ]
    .into_iter()
    .map(String::from)
    .chain(std::iter::once(format!("home/{user}")))
    .collect()
}

fn passwd_contents(user: &str) -> String {
    format!("root:x:0:0:root:/root:/bin/sh\n{user}:x:1000:1000:{user}:/home/{user}:/bin/sh\n")
}

fn profile_contents(root: &Path, home: &Path, term: &str, lang: &str, user: &str) -> String {
    let root = root.display();
    format!(
        "export PATH={root}/bin:{root}/usr/bin:$PATH\n\
         export HOME={home}\n\
         export TERM={term}\n\
         export LANG={lang}\n\
         export PS1='{user}@shellgate:\\w$ '\n",
        home = home.display(),
    )
}

/// Build `<data_dir>/linux` with a minimal FHS layout, `etc/passwd` and
/// `etc/profile`, and return a session rooted at the new home.
pub fn setup_environment(
    data_dir: &Path,
    user: &str,
    term: &str,
    lang: &str,
) -> std::io::Result<(ShellSession, EnvironmentLayout)> {
    let root = data_dir.join("linux");
    for dir in tree_dirs(user) {
        fs::create_dir_all(root.join(dir))?;
    }

    let home = root.join("home").join(user);
    fs::write(root.join("etc/passwd"), passwd_contents(user))?;
    fs::write(
        root.join("etc/profile"),
        profile_contents(&root, &home, term, lang, user),
    )?;

    tracing::info!(root = %root.display(), "linux environment ready");
    let layout = EnvironmentLayout {
        root,
        home: home.clone(),
    };
    Ok((ShellSession::new(home), layout))
}
