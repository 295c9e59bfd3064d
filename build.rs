fn main() {
    // ESP-IDF link arguments are only needed for the device build; host
    // tests build the library alone.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
