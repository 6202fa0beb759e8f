//! Video catalog: list entries and resolve one to its embed link.

use std::io::Write;

use anyhow::{Result, bail};
use babysteps_core::catalog::{VIDEOS, embed_url};
use babysteps_core::playback::VideoBrowser;

pub fn run<W: Write>(writer: &mut W, select: Option<u32>) -> Result<()> {
    let mut browser = VideoBrowser::new(&VIDEOS);

    let Some(id) = select else {
        for video in browser.videos() {
            writeln!(writer, "{:>2}. {}", video.id, video.title)?;
        }
        return Ok(());
    };

    let Some(video) = browser.select(id) else {
        bail!("video {id} is not in the catalog");
    };
    writeln!(writer, "{}", video.title)?;
    match video.youtube_id() {
        Some(video_id) => writeln!(writer, "{}", embed_url(video_id))?,
        None => writeln!(writer, "video link is broken")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_all_videos() {
        let mut output = Vec::new();
        run(&mut output, None).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.lines().count(), 10);
        assert!(output.lines().nth(9).unwrap().starts_with("10. "));
    }

    #[test]
    fn select_prints_embed_link() {
        let mut output = Vec::new();
        run(&mut output, Some(6)).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.ends_with("\nhttps://www.youtube.com/embed/2zOGMdRDvyg\n"));
    }

    #[test]
    fn select_unknown_video_fails() {
        let err = run(&mut Vec::new(), Some(42)).unwrap_err();
        assert!(err.to_string().contains("42"));
    }
}
