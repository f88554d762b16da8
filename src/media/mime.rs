use std::path::Path;

/// Audio allow-list: lowercase extension (without the dot) and the MIME type
/// the file is served with.
pub const SONG_TYPES: &[(&str, &str)] = &[
    ("mp3", "audio/mpeg"),
    ("flac", "audio/flac"),
    ("ogg", "audio/ogg"),
];

/// MIME type of a playable song, or `None` when `name` is not on the audio
/// allow-list. Extensions are matched case-insensitively.
pub fn song_mime(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?;
    SONG_TYPES
        .iter()
        .find(|(song_ext, _)| ext.eq_ignore_ascii_case(song_ext))
        .map(|(_, mime)| *mime)
}

/// Whether a directory entry named `name` is listed as a song.
/// Dot-files never are, whatever their extension.
pub fn is_song(name: &str) -> bool {
    !name.starts_with('.') && song_mime(name).is_some()
}

/// Content-Type for any file served from the library or the assets folder.
pub fn content_type_for(path: &str) -> String {
    match song_mime(path) {
        Some(mime) => mime.to_string(),
        None => mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string(),
    }
}
