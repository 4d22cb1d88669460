fn main() {
    if let Err(err) = annovis::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
