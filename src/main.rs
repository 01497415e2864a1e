fn main() {
    if let Err(err) = mindcanvas::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
