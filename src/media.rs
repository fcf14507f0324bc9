// src/media.rs

//! Known media file extensions.
//!
//! This is the collaborator behind the special `video` token in
//! `include_extensions`: at config-load time the token is replaced by this
//! list. Entries are plain suffixes matched verbatim by the extension filter.

/// Well-known video file extensions, leading dot included.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".3g2", ".3gp", ".3gp2", ".3gpp", ".asf", ".asx", ".avchd", ".avi",
    ".bik", ".divx", ".dv", ".dvr-ms", ".evo", ".flc", ".fli", ".flic",
    ".flv", ".flx", ".h264", ".m1v", ".m2p", ".m2ts", ".m2v", ".m4e",
    ".m4v", ".mjp", ".mjpeg", ".mjpg", ".mkv", ".moov", ".mov", ".movie",
    ".mp4", ".mpe", ".mpeg", ".mpg", ".mpv", ".mpv2", ".mxf", ".nsv",
    ".nut", ".ogm", ".ogv", ".qt", ".rm", ".rmvb", ".ts", ".vid", ".vob",
    ".vro", ".webm", ".wm", ".wmv", ".wmx", ".wvx", ".x264", ".xvid",
];
