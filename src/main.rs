fn main() {
    blockconf::cli::run();
}
