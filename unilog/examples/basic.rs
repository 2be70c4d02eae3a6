use unilog::{Severity, logger_config};

fn main() -> std::io::Result<()> {
    let dir = std::env::temp_dir();
    let out_path = dir.join("unilog_example_out.log");
    let err_path = dir.join("unilog_example_err.log");

    let mut logger = logger_config()
        .with_err_stream(std::io::stderr())
        .with_out_file(&out_path)?
        .with_err_file(&err_path)?
        .build();

    for severity in Severity::ALL {
        logger.log(severity, &format!("Hello from {severity}"))?;
    }

    logger.close_files_with(
        |result| println!("closed {}: {result:?}", out_path.display()),
        |result| println!("closed {}: {result:?}", err_path.display()),
    );

    let content = std::fs::read_to_string(&out_path)?;
    println!(
        "\nlast line of {}:\n\t{}",
        out_path.display(),
        content.lines().last().unwrap_or_default()
    );
    Ok(())
}
