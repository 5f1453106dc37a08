/// Which display state the hierarchy was last put in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyState {
    /// Placeholder shown, no image.
    #[default]
    Initial,
    /// Actual image shown, branches faded out.
    ImageSet,
    /// Failure image shown, or the placeholder when there is none.
    Failure,
    /// Retry image shown, or the placeholder when there is none.
    Retry,
}

impl HierarchyState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::ImageSet => "image_set",
            Self::Failure => "failure",
            Self::Retry => "retry",
        }
    }
}
