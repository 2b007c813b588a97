fn main() {
    // option_env!() values are cached between builds unless cargo is told
    // to watch the variables.
    println!("cargo:rerun-if-env-changed=SUPABASE_URL");
    println!("cargo:rerun-if-env-changed=SUPABASE_ANON_KEY");
}
