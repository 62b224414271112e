fn main() {
    println!("cargo:rerun-if-env-changed=GATE_REMOTE_URL");
    println!("cargo:rerun-if-env-changed=GATE_REMOTE_TOKEN");
    println!("cargo:rerun-if-env-changed=GATE_AP_PASSWORD");

    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
