#[cfg(test)]
mod tests {
    use super::super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_explicit_path_wins() {
        let src = config_source(Some(Path::new("a.toml")), Some("b.toml".to_string()));
        assert_eq!(src, ConfigSource::Required(PathBuf::from("a.toml")));
    }

    #[test]
    fn test_env_var_then_default() {
        assert_eq!(
            config_source(None, Some("b.toml".to_string())),
            ConfigSource::Required(PathBuf::from("b.toml"))
        );
        assert_eq!(
            config_source(None, Some(String::new())),
            ConfigSource::Optional(PathBuf::from(DEFAULT_CONFIG_FILE))
        );
        assert_eq!(config_source(None, None), ConfigSource::Optional(PathBuf::from(DEFAULT_CONFIG_FILE)));
    }

    #[test]
    fn test_missing_required_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(ConfigSource::Required(dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_missing_optional_config_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(ConfigSource::Optional(dir.path().join("gridcrit.toml"))).unwrap();
        assert_eq!(config.scoring.index_column, "Indice_Criticidade");
    }

    #[test]
    fn test_loads_file_and_applies_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gridcrit.toml");
        std::fs::write(&path, "[paths]\ndata_dir = \"/srv/grid\"\n\n[output]\ntop_n = 7\n").unwrap();

        let mut config = load_from(ConfigSource::Required(path)).unwrap();
        assert_eq!(config.output.top_n, 7);

        PathOverrides { weights: Some(PathBuf::from("w.csv")), ..Default::default() }.apply(&mut config);
        assert_eq!(config.paths.weights_path(), PathBuf::from("/srv/grid/w.csv"));
        assert_eq!(config.paths.dataset_path(), PathBuf::from("/srv/grid/interrupcoes_light.csv"));
    }
}
