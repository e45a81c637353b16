fn main() {
    signal_realign::cli::run();
}
