pub mod app;
pub mod handler;

use std::path::PathBuf;

pub use app::App;
pub use handler::AppHandler;

/// Where lip-sync audio comes from, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LipSyncInput {
    #[default]
    None,
    Microphone,
    Clip(PathBuf),
}

/// Command line: `vrmvis-rs [ASSET] [--mic | --clip <wav>]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LaunchOptions {
    pub asset: Option<String>,
    pub lip_sync: LipSyncInput,
}

impl LaunchOptions {
    /// Parse arguments, program name excluded.
    pub fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--mic" => options.lip_sync = LipSyncInput::Microphone,
                "--clip" => {
                    let path = args.next().ok_or("--clip needs a WAV path")?;
                    options.lip_sync = LipSyncInput::Clip(PathBuf::from(path));
                }
                flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
                _ if options.asset.is_none() => options.asset = Some(arg),
                _ => return Err(format!("unexpected argument {arg}")),
            }
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<LaunchOptions, String> {
        LaunchOptions::parse(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn asset_and_clip() {
        let o = parse(&["models/minsu.rig.json", "--clip", "voice.wav"]).unwrap();
        assert_eq!(o.asset.as_deref(), Some("models/minsu.rig.json"));
        assert_eq!(o.lip_sync, LipSyncInput::Clip(PathBuf::from("voice.wav")));
    }

    #[test]
    fn empty_command_line_uses_defaults() {
        assert_eq!(parse(&[]).unwrap(), LaunchOptions::default());
        assert_eq!(parse(&["--mic"]).unwrap().lip_sync, LipSyncInput::Microphone);
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert!(parse(&["--clip"]).is_err());
        assert!(parse(&["--loud"]).is_err());
        assert!(parse(&["a", "b"]).is_err());
    }
}
