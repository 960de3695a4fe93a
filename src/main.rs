fn main() {
    if let Err(err) = docpage::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
