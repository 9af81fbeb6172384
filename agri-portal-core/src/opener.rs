//! External view seam
//!
//! Opening a service "externally" means handing its url to whatever hosts
//! the portal (a browser tab, a desktop shell). The session controller only
//! talks to this trait.

/// Opens a url outside the portal page
pub trait ExternalOpener: Send + Sync {
    fn open_external(&self, url: &str);
}
