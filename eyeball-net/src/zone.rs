/// Map an IPv6 zone onto a scope id.
///
/// Interface names (e.g. `eth0`) are looked up on unix platforms,
/// other zones are parsed as a decimal interface index.
/// Returns `0` (no scope) for empty or unknown zones.
#[must_use]
pub fn zone_to_scope_id(zone: &str) -> u32 {
    if zone.is_empty() {
        return 0;
    }
    if let Some(index) = interface_index(zone) {
        return index;
    }
    let digits = zone.bytes().take_while(u8::is_ascii_digit).count();
    zone[..digits].parse().unwrap_or_default()
}

#[cfg(unix)]
fn interface_index(name: &str) -> Option<u32> {
    let name = std::ffi::CString::new(name).ok()?;
    // SAFETY: `name` is a valid nul-terminated string which outlives the call.
    let index = unsafe { libc::if_nametoindex(name.as_ptr()) };
    (index != 0).then_some(index)
}

#[cfg(not(unix))]
fn interface_index(_name: &str) -> Option<u32> {
    None
}
