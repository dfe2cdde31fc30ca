/// Discrete user input delivered by the host. Focus and exit handling stay
/// with the host; everything but channel switching maps to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    ChannelNext,
    ChannelPrevious,
    Other,
}
