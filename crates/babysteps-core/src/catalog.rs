//! Fixed media catalogs: lullaby audio tracks and hosted videos.

/// One lullaby in the audio catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    pub id: u32,
    pub title: &'static str,
    /// Path relative to the media root.
    pub url: &'static str,
}

/// One externally hosted video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Video {
    pub id: u32,
    pub title: &'static str,
    pub url: &'static str,
}

impl Video {
    /// Hosting-site id parsed from the link, if the link is well formed.
    #[must_use]
    pub fn youtube_id(&self) -> Option<&'static str> {
        youtube_id(self.url)
    }
}

pub const LULLABIES: [Track; 5] = [
    Track {
        id: 1,
        title: "Allayo alla",
        url: "/lullabies/Allayo alla.mp3",
    },
    Track {
        id: 2,
        title: "Alla Bolam Yulduz Usmonova",
        url: "/lullabies/Alla Bolam Yulduz Usmonova.mp3",
    },
    Track {
        id: 3,
        title: "Feruza Jumaniyozova - Alla (Official music)",
        url: "/lullabies/Feruza Jumaniyozova - Alla (Official music).mp3",
    },
    Track {
        id: 4,
        title: "Shahzoda- Alla",
        url: "/lullabies/Shahzoda- Alla.mp3",
    },
    Track {
        id: 5,
        title: "Gulsanam Mamazoitova Alla",
        url: "/lullabies/Gulsanam Mamazoitova Alla.mp3",
    },
];

pub const VIDEOS: [Video; 10] = [
    Video {
        id: 1,
        title: "Beshta Kichkina Chaqaloq Karavotga Sakrash + Maktabgacha Qofiyalar Bolalar Uchun",
        url: "https://youtu.be/lqYmsIjBwKQ?si=4EU9VK7FeBQrJUiv",
    },
    Video {
        id: 2,
        title: "Учим Первые Слова с Детьми!",
        url: "https://youtu.be/hj7c6DXmgz0?si=23naHHOsJWAOm05Q",
    },
    Video {
        id: 3,
        title: "По полям Синий трактор едет к нам - Песенка мультик для детей",
        url: "https://youtu.be/LbOve_UZZ54?si=-NmnxrF1_mnACEZn",
    },
    Video {
        id: 4,
        title: "A Ram Sam Sam | Cantec pentru copii + karaoke | HeyKids",
        url: "https://youtu.be/935UBEm0gg0?si=MIem6o7bpLdXhZ1V",
    },
    Video {
        id: 5,
        title: "Qadimgi Makdonaldning Fermasi Bor Edi + Bolalar Uchun Ko'proq maktabgacha Qofiyalar",
        url: "https://youtu.be/zw59NXJPEfg?si=4oGn3MvezKbTXii4",
    },
    Video {
        id: 6,
        title: "Wheels on the Bus + Johny Johny Yes Papa | Most Popular Kids Songs Compilation | LooLoo Kids",
        url: "https://youtu.be/2zOGMdRDvyg?si=A6T6qlwWLTcFDGX3",
    },
    Video {
        id: 7,
        title: "Joja Жужаларим Узбекча",
        url: "https://youtu.be/VbqWNo4o6KE?si=JjsJh3BSbKZv2ZzC",
    },
    Video {
        id: 8,
        title: "Маша и Медведь - Колыбельная песня (Спи, моя радость, усни!)",
        url: "https://youtu.be/Rer9g8kd4IY?si=cX_7g4SqbbjCOmWt",
    },
    Video {
        id: 9,
        title: "Wheels on the Bus | @CoComelon Nursery Rhymes & Kids Songs",
        url: "https://youtu.be/e_04ZrNroTo?si=11rv5jlhgQQlBLOu",
    },
    Video {
        id: 10,
        title: "Сборник Песен Для Самых Маленьких 0+ |Канал раннего развития - ЛаЛаЛуна.",
        url: "https://youtu.be/HGmTR2PT5h0?si=2kRO691oTcRQl_Ku",
    },
];

#[must_use]
pub fn find_track(id: u32) -> Option<&'static Track> {
    LULLABIES.iter().find(|t| t.id == id)
}

#[must_use]
pub fn find_video(id: u32) -> Option<&'static Video> {
    VIDEOS.iter().find(|v| v.id == id)
}

/// Extracts the video id from `youtu.be/<id>`, `watch?v=<id>` or
/// `/embed/<id>` links.
#[must_use]
pub fn youtube_id(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let (host, path_and_query) = rest
        .find('/')
        .map_or((rest, ""), |idx| (&rest[..idx], &rest[idx..]));
    let (path, query) = path_and_query
        .split_once('?')
        .unwrap_or((path_and_query, ""));
    let query = query.split('#').next().unwrap_or_default();

    if host.contains("youtu.be") {
        return path.strip_prefix('/').filter(|id| !id.is_empty());
    }

    if let Some(id) = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("v="))
        .filter(|id| !id.is_empty())
    {
        return Some(id);
    }

    let mut segments = path.split('/');
    segments.find(|s| *s == "embed")?;
    segments.next().filter(|id| !id.is_empty())
}

/// Player URL for an embedded video.
#[must_use]
pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{video_id}")
}

/// Formats a playback position as `M:SS`.
///
/// Zero, negative and non-finite inputs render as `0:00`.
#[must_use]
pub fn format_short_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "positive finite playback positions fit in u64"
    )]
    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_sequential() {
        let track_ids: Vec<u32> = LULLABIES.iter().map(|t| t.id).collect();
        assert_eq!(track_ids, vec![1, 2, 3, 4, 5]);
        let video_ids: Vec<u32> = VIDEOS.iter().map(|v| v.id).collect();
        assert_eq!(video_ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn every_catalog_video_has_an_id() {
        for video in &VIDEOS {
            assert!(video.youtube_id().is_some(), "{}", video.url);
        }
        assert_eq!(find_video(1).and_then(Video::youtube_id), Some("lqYmsIjBwKQ"));
    }

    #[test]
    fn youtube_id_handles_link_shapes() {
        assert_eq!(
            youtube_id("https://youtu.be/e_04ZrNroTo?si=abc"),
            Some("e_04ZrNroTo")
        );
        assert_eq!(
            youtube_id("https://www.youtube.com/watch?feature=share&v=2zOGMdRDvyg"),
            Some("2zOGMdRDvyg")
        );
        assert_eq!(
            youtube_id("https://www.youtube.com/embed/HGmTR2PT5h0"),
            Some("HGmTR2PT5h0")
        );
        assert_eq!(youtube_id("https://www.youtube.com/channel/xyz"), None);
        assert_eq!(youtube_id("not a url"), None);
        assert_eq!(youtube_id("https://youtu.be/"), None);
    }

    #[test]
    fn embed_url_uses_player_path() {
        assert_eq!(
            embed_url("Rer9g8kd4IY"),
            "https://www.youtube.com/embed/Rer9g8kd4IY"
        );
    }

    #[test]
    fn short_time_format() {
        assert_eq!(format_short_time(0.0), "0:00");
        assert_eq!(format_short_time(f64::NAN), "0:00");
        assert_eq!(format_short_time(5.9), "0:05");
        assert_eq!(format_short_time(185.0), "3:05");
    }

    #[test]
    fn lookups_by_id() {
        assert_eq!(find_track(3).map(|t| t.title), Some("Feruza Jumaniyozova - Alla (Official music)"));
        assert!(find_track(6).is_none());
        assert!(find_video(11).is_none());
    }
}
