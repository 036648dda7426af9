fn main() {
    jukebox_lib::run()
}
