use std::{collections::BTreeMap, fmt, io, sync::Arc};

#[derive(Debug, Clone)]
pub struct AvatarError {
    pub key: &'static str,
    pub args: BTreeMap<&'static str, String>,
    pub causes: Vec<AvatarCause>,
}

#[derive(Debug, Clone)]
pub enum AvatarCause {
    Avatar(Box<AvatarError>),
    Std(Arc<dyn std::error::Error + Send + Sync>),
}

impl AvatarError {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            args: BTreeMap::new(),
            causes: Vec::new(),
        }
    }

    pub fn with_arg(mut self, k: &'static str, v: impl ToString) -> Self {
        self.args.insert(k, v.to_string());
        self
    }

    pub fn push_avatar(mut self, cause: AvatarError) -> Self {
        self.causes.push(AvatarCause::Avatar(Box::new(cause)));
        self
    }

    pub fn push_std(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.causes.push(AvatarCause::Std(Arc::new(cause)));
        self
    }

    /// Argument lookup, mostly for tests and log formatting.
    pub fn arg(&self, k: &str) -> Option<&str> {
        self.args.get(k).map(String::as_str)
    }
}

impl fmt::Display for AvatarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.key)?;
        let mut first = true;
        for (k, v) in &self.args {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{k}={v}")?;
        }
        write!(f, ")")?;
        for cause in &self.causes {
            match cause {
                AvatarCause::Avatar(e) => write!(f, ": {e}")?,
                AvatarCause::Std(e) => write!(f, ": {e}")?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for AvatarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes.iter().find_map(|c| match c {
            AvatarCause::Avatar(e) => Some(e.as_ref() as &dyn std::error::Error),
            AvatarCause::Std(e) => Some(e.as_ref() as &(dyn std::error::Error + 'static)),
        })
    }
}

impl From<String> for AvatarError {
    fn from(s: String) -> Self {
        AvatarError::new("string-error").with_arg("msg", s)
    }
}

impl From<&str> for AvatarError {
    fn from(s: &str) -> Self {
        AvatarError::new("str-error").with_arg("msg", s)
    }
}

impl From<io::Error> for AvatarError {
    fn from(err: io::Error) -> Self {
        AvatarError::new("io-error").push_std(err)
    }
}

impl From<reqwest::Error> for AvatarError {
    fn from(err: reqwest::Error) -> Self {
        AvatarError::new("reqwest::Error").push_std(err)
    }
}

impl From<serde_json::Error> for AvatarError {
    fn from(err: serde_json::Error) -> Self {
        AvatarError::new("serde_json::Error").push_std(err)
    }
}

impl From<hound::Error> for AvatarError {
    fn from(err: hound::Error) -> Self {
        AvatarError::new("hound::Error").push_std(err)
    }
}

impl From<cpal::DefaultStreamConfigError> for AvatarError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        AvatarError::new("cpal::DefaultStreamConfigError").push_std(err)
    }
}

impl From<cpal::BuildStreamError> for AvatarError {
    fn from(err: cpal::BuildStreamError) -> Self {
        AvatarError::new("cpal::BuildStreamError").push_std(err)
    }
}

impl From<cpal::PlayStreamError> for AvatarError {
    fn from(err: cpal::PlayStreamError) -> Self {
        AvatarError::new("cpal::PlayStreamError").push_std(err)
    }
}

impl From<wgpu::CreateSurfaceError> for AvatarError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        AvatarError::new("wgpu::CreateSurfaceError").push_std(err)
    }
}

impl From<wgpu::SurfaceError> for AvatarError {
    fn from(err: wgpu::SurfaceError) -> Self {
        AvatarError::new("wgpu::SurfaceError").push_std(err)
    }
}

impl From<winit::error::EventLoopError> for AvatarError {
    fn from(err: winit::error::EventLoopError) -> Self {
        AvatarError::new("winit::error::EventLoopError").push_std(err)
    }
}
