use std::path::PathBuf;

use clap::Parser;

use crate::basics::hello_index::HelloIndexConfig;

/// Hello Index: a textured quad drawn with an index buffer.
#[derive(Parser, Debug)]
#[command(name = "cg3d", version, about)]
pub struct Args {
    /// Texture file for the quad.
    pub texture: Option<PathBuf>,

    /// Log filter override, e.g. `debug` or `info,wgpu_core=warn`.
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl Args {
    /// Chapter config with the defaults overridden by the given arguments.
    pub fn hello_index_config(&self) -> HelloIndexConfig {
        let mut config = HelloIndexConfig::default();
        if let Some(path) = &self.texture {
            config.texture_path = path.clone();
        }
        config
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::resources::CHECKER_TEXTURE;

    #[test]
    fn no_arguments_keeps_default_texture() {
        let args = Args::try_parse_from(["cg3d"]).unwrap();
        assert_eq!(args.hello_index_config().texture_path, PathBuf::from(CHECKER_TEXTURE));
        assert!(args.log_filter.is_none());
    }

    #[test]
    fn positional_argument_overrides_texture() {
        let args = Args::try_parse_from(["cg3d", "assets/wall.png"]).unwrap();
        assert_eq!(args.hello_index_config().texture_path, PathBuf::from("assets/wall.png"));
    }

    #[test]
    fn log_filter_flag_is_parsed() {
        let args = Args::try_parse_from(["cg3d", "--log-filter", "debug"]).unwrap();
        assert_eq!(args.log_filter.as_deref(), Some("debug"));
        assert!(args.texture.is_none());
    }

    #[test]
    fn help_is_not_taken_as_a_texture() {
        let err = Args::try_parse_from(["cg3d", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = Args::try_parse_from(["cg3d", "--fullscreen"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn extra_positional_is_rejected() {
        assert!(Args::try_parse_from(["cg3d", "a.png", "b.png"]).is_err());
    }
}
