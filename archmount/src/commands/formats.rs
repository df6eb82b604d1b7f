use archmount_core::Config;

pub fn run(config: Config) {
    println!("{:<10}  {:<12}  {:<9}  Default options", "Extension", "Helper", "Installed");
    println!("{}", "-".repeat(60));

    for helper in config.helpers.iter() {
        let installed = helper.executable_path(&config.helpers_dir).is_file();
        let defaults = match helper.default_options.join(",") {
            s if s.is_empty() => "-".to_string(),
            s => s,
        };
        println!(
            "{:<10}  {:<12}  {:<9}  {}",
            helper.extension,
            helper.executable_name,
            if installed { "yes" } else { "no" },
            defaults
        );
    }

    println!();
    println!("Helpers directory: {}", config.helpers_dir.display());
}
