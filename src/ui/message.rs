#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppMessage {
    Quit,
    TogglePlayPause,
    NextTrack,
    LoadMore,
    Generate,
    InsertChar(char),
    DeleteChar,
    ClearPrompt,
}
