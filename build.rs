fn main() {
    // Emits the ESP-IDF environment when cross-compiling for espidf;
    // a no-op on host builds.
    embuild::espidf::sysenv::output();
}
