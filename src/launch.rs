use std::io;

/// Hands a URI to whatever the OS has registered for it: a torrent client
/// for `magnet:` links, the browser for `http(s):` links.
pub trait Launcher {
    fn launch(&self, target: &str) -> io::Result<()>;
}

#[derive(Default)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&self, target: &str) -> io::Result<()> {
        open::that_detached(target)
    }
}
