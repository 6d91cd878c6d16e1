use std::fmt;

/// Handle returned by [`ShadowAtlas::reserve`][crate::ShadowAtlas::reserve].
///
/// It's the position of the request in reservation order, so it's only
/// meaningful for the atlas that issued it and only until that atlas is
/// cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(usize);

impl RequestId {
    pub(crate) fn new(index: usize) -> Self {
        RequestId(index)
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}
