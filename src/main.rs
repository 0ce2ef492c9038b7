fn main() {
    if let Err(e) = yoloprep::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
