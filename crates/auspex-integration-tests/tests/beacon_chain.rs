//! Integration test: the multiparty commit-reveal beacon.
//!
//! Exercises the hash chain across several qualified reporters:
//! 1. First commitments carry empty reveals and anchor at the null digest
//! 2. Reveals must hash to the prior commitment and respect the cooldown
//! 3. The multiparty digest chains across *distinct* reporters only
//! 4. Forfeits drop a commitment without poisoning the chain
//! 5. Verified reveals count as global writes for ranking purposes

use rand::distributions::Alphanumeric;
use rand::{Rng, SeedableRng};

use auspex_engine::beacon::sha256;
use auspex_engine::rank::StaticRanking;
use auspex_engine::{Engine, EngineError};
use auspex_types::{Digest, Timestamp, NULL_DIGEST};

const COOLDOWN: Timestamp = 55_000_000;
const BASE_TIME: Timestamp = 1_700_000_000_000_000;

fn ranking() -> StaticRanking {
    StaticRanking::new(vec![
        "alpha".to_string(),
        "beta".to_string(),
        "gamma".to_string(),
    ])
}

fn commit_to(secret: &str) -> Digest {
    sha256(secret.as_bytes())
}

/// Reference multiparty chain step: `sha256(hex(prev) || reveal)`.
fn chain(prev: Digest, reveal: &str) -> Digest {
    let mut input = hex::encode(prev);
    input.push_str(reveal);
    sha256(input.as_bytes())
}

#[test]
fn multiparty_chain_across_three_reporters() {
    let mut engine = Engine::new("auspex.gov");
    let r = ranking();

    // Random reveals so the chain is not built from fixed strings.
    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let secrets: Vec<String> = (0..3)
        .map(|_| (&mut rng).sample_iter(Alphanumeric).take(16).map(char::from).collect())
        .collect();

    // =========================================================
    // Round 1: everyone commits, nothing revealed yet.
    // =========================================================
    let t1 = BASE_TIME;
    for (i, reporter) in ["alpha", "beta", "gamma"].iter().enumerate() {
        engine
            .write_hash(&r, reporter, commit_to(&secrets[i]), "", t1 + i as Timestamp)
            .expect("First commitment should succeed");
        let entry = engine.commit(reporter).expect("Commitment should be live");
        assert_eq!(entry.multiparty, NULL_DIGEST);
        assert!(engine.global_stat(reporter).is_none());
    }

    // =========================================================
    // Round 2: reveals chain across distinct reporters in order.
    // =========================================================
    let t2 = t1 + COOLDOWN;
    engine
        .write_hash(&r, "alpha", commit_to("next-a"), &secrets[0], t2)
        .expect("Alpha's reveal should succeed");
    // No foreign reveal existed yet: alpha's digest IS the null anchor.
    let alpha_mp = NULL_DIGEST;
    assert_eq!(
        engine.commit("alpha").expect("Live commitment").multiparty,
        alpha_mp
    );

    engine
        .write_hash(&r, "beta", commit_to("next-b"), &secrets[1], t2 + 1)
        .expect("Beta's reveal should succeed");
    let beta_mp = chain(alpha_mp, &secrets[1]);
    assert_eq!(
        engine.commit("beta").expect("Live commitment").multiparty,
        beta_mp
    );

    engine
        .write_hash(&r, "gamma", commit_to("next-c"), &secrets[2], t2 + 2)
        .expect("Gamma's reveal should succeed");
    let gamma_mp = chain(beta_mp, &secrets[2]);
    assert_eq!(
        engine.commit("gamma").expect("Live commitment").multiparty,
        gamma_mp
    );

    // Each digest is distinct: no reporter controls the beacon alone.
    assert_ne!(alpha_mp, beta_mp);
    assert_ne!(beta_mp, gamma_mp);

    // Verified reveals register as global writes.
    for reporter in ["alpha", "beta", "gamma"] {
        assert_eq!(engine.global_stat(reporter).map(|s| s.count), Some(1));
    }
}

#[test]
fn reveal_preconditions_are_enforced() {
    let mut engine = Engine::new("auspex.gov");
    let r = ranking();

    // Unqualified reporters cannot touch the beacon.
    assert!(matches!(
        engine.write_hash(&r, "mallory", commit_to("x"), "", BASE_TIME),
        Err(EngineError::NotQualified)
    ));

    // First commitment must not reveal anything.
    assert!(matches!(
        engine.write_hash(&r, "alpha", commit_to("s1"), "stray", BASE_TIME),
        Err(EngineError::InvalidReveal)
    ));
    engine
        .write_hash(&r, "alpha", commit_to("s1"), "", BASE_TIME)
        .expect("First commitment should succeed");

    // Second commitment inside the cooldown window.
    assert!(matches!(
        engine.write_hash(&r, "alpha", commit_to("s2"), "s1", BASE_TIME + COOLDOWN - 1),
        Err(EngineError::Cooldown)
    ));

    // Wrong reveal after the cooldown.
    assert!(matches!(
        engine.write_hash(&r, "alpha", commit_to("s2"), "not-s1", BASE_TIME + COOLDOWN),
        Err(EngineError::HashMismatch)
    ));
    // The failed attempts left the original commitment untouched.
    assert_eq!(
        engine.commit("alpha").expect("Live commitment").commitment,
        commit_to("s1")
    );

    engine
        .write_hash(&r, "alpha", commit_to("s2"), "s1", BASE_TIME + COOLDOWN)
        .expect("Correct reveal should succeed");
}

#[test]
fn forfeit_restarts_without_breaking_others() {
    let mut engine = Engine::new("auspex.gov");
    let r = ranking();

    engine
        .write_hash(&r, "alpha", commit_to("a1"), "", BASE_TIME)
        .expect("Alpha's commitment should succeed");
    engine
        .write_hash(&r, "beta", commit_to("b1"), "", BASE_TIME)
        .expect("Beta's commitment should succeed");

    let t2 = BASE_TIME + COOLDOWN;
    engine
        .write_hash(&r, "alpha", commit_to("a2"), "a1", t2)
        .expect("Alpha's reveal should succeed");
    // Alpha's reveal had no foreign predecessor: it carries the null anchor.
    let alpha_mp = NULL_DIGEST;
    assert_eq!(
        engine.commit("alpha").expect("Live commitment").multiparty,
        alpha_mp
    );

    // Beta abandons the round; forfeiting twice is harmless.
    engine.forfeit_hash("beta");
    engine.forfeit_hash("beta");
    assert!(engine.commit("beta").is_none());

    // Beta restarts with an empty reveal and chains off alpha's digest on
    // the following round.
    engine
        .write_hash(&r, "beta", commit_to("b2"), "", t2)
        .expect("Beta's restart should succeed");
    engine
        .write_hash(&r, "beta", commit_to("b3"), "b2", t2 + COOLDOWN)
        .expect("Beta's reveal should succeed");
    assert_eq!(
        engine.commit("beta").expect("Live commitment").multiparty,
        chain(alpha_mp, "b2")
    );

    // Beta's forfeited round never counted as a write.
    assert_eq!(engine.global_stat("beta").map(|s| s.count), Some(1));
}
