use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SoundKey {
    Win,
    Lose,
    Clap,
    Roll,
    Pick,
}

impl SoundKey {
    pub const ALL: [SoundKey; 5] = [
        SoundKey::Win,
        SoundKey::Lose,
        SoundKey::Clap,
        SoundKey::Roll,
        SoundKey::Pick,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SoundKey::Win => "WIN",
            SoundKey::Lose => "LOSE",
            SoundKey::Clap => "CLAP",
            SoundKey::Roll => "ROLL",
            SoundKey::Pick => "PICK",
        }
    }

    /// Clip the front end preloads for this key. PICK reuses the applause clip.
    pub fn url(self) -> &'static str {
        match self {
            SoundKey::Win => "https://assets.mixkit.co/active_storage/sfx/2017/2017-preview.mp3",
            SoundKey::Lose => "https://assets.mixkit.co/active_storage/sfx/265/265-preview.mp3",
            SoundKey::Clap | SoundKey::Pick => {
                "https://assets.mixkit.co/active_storage/sfx/1435/1435-preview.mp3"
            }
            SoundKey::Roll => "https://assets.mixkit.co/active_storage/sfx/2571/2571-preview.mp3",
        }
    }
}

/// Fire-and-forget playback. Implementations swallow their own failures.
pub trait AudioSink {
    fn play(&mut self, key: SoundKey);
}

/// Collects requested sounds so they can ride back on a response for the
/// front end to play.
#[derive(Debug, Default)]
pub struct Effects {
    sounds: Vec<SoundKey>,
}

impl Effects {
    #[cfg(test)]
    pub fn sounds(&self) -> &[SoundKey] {
        &self.sounds
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.sounds
                .iter()
                .map(|k| serde_json::json!({ "sound": k.as_str() }))
                .collect(),
        )
    }
}

impl AudioSink for Effects {
    fn play(&mut self, key: SoundKey) {
        tracing::trace!(sound = key.as_str(), "queued sound effect");
        self.sounds.push(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_serialize_in_play_order() {
        let mut fx = Effects::default();
        fx.play(SoundKey::Roll);
        fx.play(SoundKey::Clap);
        assert_eq!(fx.sounds(), &[SoundKey::Roll, SoundKey::Clap]);
        assert_eq!(
            fx.to_json(),
            serde_json::json!([{ "sound": "ROLL" }, { "sound": "CLAP" }])
        );
        assert_eq!(SoundKey::Pick.url(), SoundKey::Clap.url());
    }
}
