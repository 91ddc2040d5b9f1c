//! Visual transition capability
//!
//! A host may be able to animate between two document states atomically
//! (view transitions). The controller only uses the capability when the
//! page's stylesheets declare an automatic navigation-triggered transition
//! rule; the capability itself is advisory and never required for
//! correctness.

/// Host-provided transition wrapper around a DOM update
pub trait ViewTransitioner {
    /// The update step is about to mutate the document
    fn begin(&mut self);

    /// The update step settled; the transition may play out.
    ///
    /// Not called when the update fails - the transition is abandoned with
    /// the navigation.
    fn complete(&mut self);
}
