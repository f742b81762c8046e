use indicatif::{ProgressBar, ProgressStyle};

pub(crate) fn create_progress_bar(total_lines: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_lines);

    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "[{spinner:.green} {elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} lines ({percent}%) {msg}",
            )
            .expect("Failed to create progress bar")
            .progress_chars("#>-"),
    );
    pb.set_message(msg.to_owned());

    pb
}
