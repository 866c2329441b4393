use crate::cli::InitArgs;
use crate::config::{CONFIG_FILE_NAME, generate_config_template};
use crate::fs::{FileSystem, default_fs};
use crate::style;

pub fn cmd_init(args: InitArgs) -> i32 {
    cmd_init_with_fs(args, default_fs())
}

pub fn cmd_init_with_fs(args: InitArgs, fs: &dyn FileSystem) -> i32 {
    if !fs.is_dir(&args.path) {
        style::error(&format!(
            "Not a directory: {}",
            style::path(&args.path)
        ));
        return 1;
    }

    let config_path = args.path.join(CONFIG_FILE_NAME);
    if fs.exists(&config_path) {
        style::error(&format!(
            "{} already exists at {}",
            CONFIG_FILE_NAME,
            style::path(&config_path)
        ));
        return 1;
    }

    if let Err(e) = fs.write(&config_path, &generate_config_template()) {
        style::error(&format!("Failed to write config file: {}", e));
        return 1;
    }

    style::success(&format!(
        "Created {} at {}",
        CONFIG_FILE_NAME,
        style::path(&config_path)
    ));
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fs::mock::MockFs;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_init_writes_parseable_template() {
        let fs = MockFs::new().with_dir("/work");
        let code = cmd_init_with_fs(
            InitArgs {
                path: PathBuf::from("/work"),
            },
            &fs,
        );

        assert_eq!(code, 0);
        let written = fs.file(Path::new("/work/.osintree.toml")).unwrap();
        assert_eq!(Config::parse(&written).unwrap(), Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let fs = MockFs::with_files([(Path::new("/work/.osintree.toml"), "# mine")]);
        let code = cmd_init_with_fs(
            InitArgs {
                path: PathBuf::from("/work"),
            },
            &fs,
        );

        assert_eq!(code, 1);
        assert_eq!(
            fs.file(Path::new("/work/.osintree.toml")).as_deref(),
            Some("# mine")
        );
    }

    #[test]
    fn test_init_requires_directory() {
        let fs = MockFs::new();
        let code = cmd_init_with_fs(
            InitArgs {
                path: PathBuf::from("/missing"),
            },
            &fs,
        );
        assert_eq!(code, 1);
    }
}
