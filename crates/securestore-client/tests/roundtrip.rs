use securestore_client::{ClientError, DataStore, MemoryDataStore, MemoryKeyStore, Vault};
use securestore_core::derivation;

fn new_vault() -> Vault<MemoryDataStore, MemoryKeyStore> {
    Vault::new(MemoryDataStore::new(), MemoryKeyStore::new())
}

/// Addresses on `load_file`'s read path for a freshly single-block
/// `alice`/"memo" file: the inode, the sharing record, and the one data
/// block, excluding the user record, which `load_file` never re-reads
/// once a session is already established.
fn load_path_addresses(vault: &Vault<MemoryDataStore, MemoryKeyStore>) -> Vec<String> {
    let user_addr = derivation::user_address("alice", "pw1").unwrap();
    vault
        .data_store()
        .contents()
        .into_keys()
        .filter(|addr| addr != &user_addr)
        .collect()
}

#[test]
fn scenario_1_round_trip() {
    let vault = new_vault();
    let alice = vault.init_user("alice", "pw1").unwrap();
    alice.store_file("memo", b"hello").unwrap();
    assert_eq!(alice.load_file("memo").unwrap(), b"hello");
}

#[test]
fn scenario_2_append_concatenation() {
    let vault = new_vault();
    let alice = vault.init_user("alice", "pw1").unwrap();
    alice.store_file("memo", b"abc").unwrap();
    alice.append_file("memo", b"de").unwrap();
    alice.append_file("memo", b"f").unwrap();
    assert_eq!(alice.load_file("memo").unwrap(), b"abcdef");
}

#[test]
fn scenario_3_tamper_detection_on_data_block() {
    // Flip one byte in every ciphertext on the load path (the inode, the
    // sharing record, the one data block), at a range of offsets including
    // ones that land inside non-final CFB blocks (where self-synchronization
    // corrupts the following block's plaintext wholesale, often hitting a
    // postcard length prefix instead of the MAC/signature), and confirm the
    // next load always fails with IntegrityError specifically, never
    // succeeding, never returning wrong bytes, and never surfacing as an
    // undifferentiated crypto error.
    //
    // Every data-block/sharing-record address is freshly randomized per
    // `store_file` call, so each (address, offset) trial rebuilds the file
    // in its own vault and reads the address back out of that same vault,
    // rather than reusing an address harvested from a different instance.
    let reference = new_vault();
    reference.init_user("alice", "pw1").unwrap().store_file("memo", b"abc").unwrap();
    let num_addresses = load_path_addresses(&reference).len();
    assert!(num_addresses > 0);

    for index in 0..num_addresses {
        let sizing_vault = new_vault();
        sizing_vault.init_user("alice", "pw1").unwrap().store_file("memo", b"abc").unwrap();
        let mut addrs = load_path_addresses(&sizing_vault);
        addrs.sort();
        let len = sizing_vault.data_store().get(&addrs[index]).unwrap().len();

        for offset in offsets_to_probe(len) {
            let vault = new_vault();
            let alice = vault.init_user("alice", "pw1").unwrap();
            alice.store_file("memo", b"abc").unwrap();
            let mut addrs = load_path_addresses(&vault);
            addrs.sort();
            let address = addrs[index].clone();
            flip_byte_at(vault.data_store(), &address, offset);
            let result = alice.load_file("memo");
            assert!(
                matches!(result, Err(ClientError::IntegrityError(_))),
                "tampering address {address} at offset {offset} did not yield IntegrityError: {result:?}"
            );
        }
    }
}

/// A spread of offsets into a ciphertext blob: the first byte (the IV, for
/// a symmetric envelope), an early interior byte, the midpoint, and the
/// last byte, so the probe isn't confined to a spot that conveniently
/// avoids ever corrupting a length prefix.
fn offsets_to_probe(len: usize) -> Vec<usize> {
    let mut offsets = vec![0, len / 4, len / 2, len - 1];
    offsets.retain(|&o| o < len);
    offsets.sort_unstable();
    offsets.dedup();
    offsets
}

fn flip_byte_at(store: &MemoryDataStore, address: &str, offset: usize) {
    let mut bytes = store.contents().get(address).cloned().unwrap();
    bytes[offset] ^= 0x01;
    store.set(address, bytes);
}

#[test]
fn scenario_4_share_and_receive() {
    let vault = new_vault();
    let alice = vault.init_user("alice", "pw1").unwrap();
    let bob = vault.init_user("bob", "pw2").unwrap();

    alice.store_file("memo", b"abc").unwrap();
    let cap = alice.share_file("memo", "bob").unwrap();
    bob.receive_file("notes", "alice", &cap).unwrap();

    assert_eq!(bob.load_file("notes").unwrap(), b"abc");
    bob.append_file("notes", b"d").unwrap();
    assert_eq!(alice.load_file("memo").unwrap(), b"abcd");
}

#[test]
fn scenario_5_revoke_isolates_recipient() {
    let vault = new_vault();
    let alice = vault.init_user("alice", "pw1").unwrap();
    let bob = vault.init_user("bob", "pw2").unwrap();

    alice.store_file("memo", b"abc").unwrap();
    let cap = alice.share_file("memo", "bob").unwrap();
    bob.receive_file("notes", "alice", &cap).unwrap();
    bob.append_file("notes", b"d").unwrap();
    assert_eq!(alice.load_file("memo").unwrap(), b"abcd");

    alice.revoke_file("memo").unwrap();

    let bob_load = bob.load_file("notes");
    assert!(matches!(
        bob_load,
        Err(ClientError::IntegrityError(_)) | Err(ClientError::NotFound(_))
    ));

    assert_eq!(alice.load_file("memo").unwrap(), b"abcd");
    alice.append_file("memo", b"e").unwrap();
    assert_eq!(alice.load_file("memo").unwrap(), b"abcde");
}

#[test]
fn scenario_6_tampered_capability_rejected() {
    let vault = new_vault();
    let alice = vault.init_user("alice", "pw1").unwrap();
    let bob = vault.init_user("bob", "pw2").unwrap();

    alice.store_file("memo", b"abc").unwrap();
    let cap = alice.share_file("memo", "bob").unwrap();

    let mut bytes = hex::decode(&cap).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    let tampered = hex::encode(bytes);

    let result = bob.receive_file("notes", "alice", &tampered);
    assert!(matches!(result, Err(ClientError::IntegrityError(_))));
}

#[test]
fn share_authenticity_rejects_wrong_signer() {
    let vault = new_vault();
    let alice = vault.init_user("alice", "pw1").unwrap();
    let mallory = vault.init_user("mallory", "pw3").unwrap();
    let bob = vault.init_user("bob", "pw2").unwrap();

    alice.store_file("memo", b"abc").unwrap();
    // Mallory issues a capability to bob but claims to be alice's share.
    let forged_cap = mallory.share_file("memo", "bob");
    // Mallory has no file named "memo" of her own, so this fails upstream
    // with NotFound before a signature is even produced: forging
    // authenticity requires possession of the real chain.
    assert!(forged_cap.is_err());

    // A genuine capability, receive_file under the wrong claimed sender
    // must fail signature verification.
    let cap = alice.share_file("memo", "bob").unwrap();
    let result = bob.receive_file("notes", "mallory", &cap);
    assert!(matches!(result, Err(ClientError::NotFound(_)) | Err(ClientError::IntegrityError(_))));
}

#[test]
fn filename_privacy_allows_distinct_local_names() {
    let vault = new_vault();
    let alice = vault.init_user("alice", "pw1").unwrap();
    let bob = vault.init_user("bob", "pw2").unwrap();

    alice.store_file("memo", b"shared content").unwrap();
    let cap = alice.share_file("memo", "bob").unwrap();
    bob.receive_file("bobs-own-name", "alice", &cap).unwrap();

    assert_eq!(alice.load_file("memo").unwrap(), b"shared content");
    assert_eq!(bob.load_file("bobs-own-name").unwrap(), b"shared content");
}

#[test]
fn receive_file_refuses_existing_local_filename() {
    let vault = new_vault();
    let alice = vault.init_user("alice", "pw1").unwrap();
    let bob = vault.init_user("bob", "pw2").unwrap();

    bob.store_file("notes", b"bob's own file").unwrap();
    alice.store_file("memo", b"abc").unwrap();
    let cap = alice.share_file("memo", "bob").unwrap();

    let result = bob.receive_file("notes", "alice", &cap);
    assert!(matches!(result, Err(ClientError::AlreadyExists(_))));
}

#[test]
fn credential_privacy_addresses_differ_from_username_and_vary_with_input() {
    let vault = new_vault();
    let _ = vault.init_user("alice", "pw1").unwrap();
    // login must succeed with the exact same credentials...
    assert!(vault.get_user("alice", "pw1").is_ok());
    // ...and fail (not found, since the address itself moves) for any
    // byte change in username or password.
    assert!(vault.get_user("alicee", "pw1").is_err());
    assert!(vault.get_user("alice", "pw2").is_err());
}

#[test]
fn load_nonexistent_file_is_not_found() {
    let vault = new_vault();
    let alice = vault.init_user("alice", "pw1").unwrap();
    assert!(matches!(alice.load_file("nope"), Err(ClientError::NotFound(_))));
}

#[test]
fn store_file_over_existing_filename_resets_contents() {
    let vault = new_vault();
    let alice = vault.init_user("alice", "pw1").unwrap();
    alice.store_file("memo", b"first").unwrap();
    alice.append_file("memo", b"-appended").unwrap();
    assert_eq!(alice.load_file("memo").unwrap(), b"first-appended");

    alice.store_file("memo", b"reset").unwrap();
    assert_eq!(alice.load_file("memo").unwrap(), b"reset");
}
