/// Viewport oracle: is the host context within `threshold` pixels of the visible area?
pub trait Visibility {
    fn is_visible(&self, context: &str, threshold: u32) -> bool;
}

impl<F> Visibility for F
where
    F: Fn(&str, u32) -> bool,
{
    fn is_visible(&self, context: &str, threshold: u32) -> bool {
        self(context, threshold)
    }
}
