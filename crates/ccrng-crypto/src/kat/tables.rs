//! Power-up known-answer vector tables.

use super::{CipherVector, DrbgVector, HashVector, HmacVector};
use ccrng_types::{ChCertError, CipherAlgId, CipherDirection, FipsError, HashAlgId, MacAlgId};
use hex_literal::hex;

/// AES power-up vectors (NIST SP 800-38A F.1, F.2, F.5).
pub static AES: &[CipherVector<'static, FipsError>] = &[
    CipherVector {
        name: "AES-128-ECB encrypt",
        code: FipsError::AesEcbPut,
        alg: CipherAlgId::Aes128Ecb,
        dir: CipherDirection::Encrypt,
        key: &hex!("2b7e151628aed2a6abf7158809cf4f3c"),
        iv: &[],
        input: &hex!("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"),
        output: &hex!("3ad77bb40d7a3660a89ecaf32466ef97f5d3d58503b9699de785895a96fdbaaf"),
    },
    CipherVector {
        name: "AES-128-ECB decrypt",
        code: FipsError::AesEcbPut,
        alg: CipherAlgId::Aes128Ecb,
        dir: CipherDirection::Decrypt,
        key: &hex!("2b7e151628aed2a6abf7158809cf4f3c"),
        iv: &[],
        input: &hex!("3ad77bb40d7a3660a89ecaf32466ef97f5d3d58503b9699de785895a96fdbaaf"),
        output: &hex!("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"),
    },
    CipherVector {
        name: "AES-128-CBC encrypt",
        code: FipsError::AesCbcPut,
        alg: CipherAlgId::Aes128Cbc,
        dir: CipherDirection::Encrypt,
        key: &hex!("2b7e151628aed2a6abf7158809cf4f3c"),
        iv: &hex!("000102030405060708090a0b0c0d0e0f"),
        input: &hex!("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"),
        output: &hex!("7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b2"),
    },
    CipherVector {
        name: "AES-128-CBC decrypt",
        code: FipsError::AesCbcPut,
        alg: CipherAlgId::Aes128Cbc,
        dir: CipherDirection::Decrypt,
        key: &hex!("2b7e151628aed2a6abf7158809cf4f3c"),
        iv: &hex!("000102030405060708090a0b0c0d0e0f"),
        input: &hex!("7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b2"),
        output: &hex!("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"),
    },
    CipherVector {
        name: "AES-128-CTR encrypt",
        code: FipsError::AesCtrPut,
        alg: CipherAlgId::Aes128Ctr,
        dir: CipherDirection::Encrypt,
        key: &hex!("2b7e151628aed2a6abf7158809cf4f3c"),
        iv: &hex!("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff"),
        input: &hex!("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"),
        output: &hex!("874d6191b620e3261bef6864990db6ce9806f66b7970fdff8617187bb9fffdff"),
    },
    CipherVector {
        name: "AES-128-CTR decrypt",
        code: FipsError::AesCtrPut,
        alg: CipherAlgId::Aes128Ctr,
        dir: CipherDirection::Decrypt,
        key: &hex!("2b7e151628aed2a6abf7158809cf4f3c"),
        iv: &hex!("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff"),
        input: &hex!("874d6191b620e3261bef6864990db6ce9806f66b7970fdff8617187bb9fffdff"),
        output: &hex!("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"),
    },
    CipherVector {
        name: "AES-256-ECB encrypt",
        code: FipsError::AesEcbPut,
        alg: CipherAlgId::Aes256Ecb,
        dir: CipherDirection::Encrypt,
        key: &hex!("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4"),
        iv: &[],
        input: &hex!("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"),
        output: &hex!("f3eed1bdb5d2a03c064b5a7e3db181f8591ccb10d410ed26dc5ba74a31362870"),
    },
    CipherVector {
        name: "AES-256-ECB decrypt",
        code: FipsError::AesEcbPut,
        alg: CipherAlgId::Aes256Ecb,
        dir: CipherDirection::Decrypt,
        key: &hex!("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4"),
        iv: &[],
        input: &hex!("f3eed1bdb5d2a03c064b5a7e3db181f8591ccb10d410ed26dc5ba74a31362870"),
        output: &hex!("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"),
    },
    CipherVector {
        name: "AES-256-CBC encrypt",
        code: FipsError::AesCbcPut,
        alg: CipherAlgId::Aes256Cbc,
        dir: CipherDirection::Encrypt,
        key: &hex!("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4"),
        iv: &hex!("000102030405060708090a0b0c0d0e0f"),
        input: &hex!("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"),
        output: &hex!("f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d"),
    },
    CipherVector {
        name: "AES-256-CBC decrypt",
        code: FipsError::AesCbcPut,
        alg: CipherAlgId::Aes256Cbc,
        dir: CipherDirection::Decrypt,
        key: &hex!("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4"),
        iv: &hex!("000102030405060708090a0b0c0d0e0f"),
        input: &hex!("f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d"),
        output: &hex!("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"),
    },
    CipherVector {
        name: "AES-256-CTR encrypt",
        code: FipsError::AesCtrPut,
        alg: CipherAlgId::Aes256Ctr,
        dir: CipherDirection::Encrypt,
        key: &hex!("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4"),
        iv: &hex!("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff"),
        input: &hex!("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"),
        output: &hex!("601ec313775789a5b7a7f504bbf3d228f443e3ca4d62b59aca84e990cacaf5c5"),
    },
    CipherVector {
        name: "AES-256-CTR decrypt",
        code: FipsError::AesCtrPut,
        alg: CipherAlgId::Aes256Ctr,
        dir: CipherDirection::Decrypt,
        key: &hex!("603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4"),
        iv: &hex!("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff"),
        input: &hex!("601ec313775789a5b7a7f504bbf3d228f443e3ca4d62b59aca84e990cacaf5c5"),
        output: &hex!("6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51"),
    },
];

/// SM4 power-up vectors (GB/T 32907 key and block).
pub static SM4: &[CipherVector<'static, ChCertError>] = &[
    CipherVector {
        name: "SM4-ECB encrypt",
        code: ChCertError::Sm4EcbPut,
        alg: CipherAlgId::Sm4Ecb,
        dir: CipherDirection::Encrypt,
        key: &hex!("0123456789abcdeffedcba9876543210"),
        iv: &[],
        input: &hex!("0123456789abcdeffedcba98765432100123456789abcdeffedcba9876543210"),
        output: &hex!("681edf34d206965e86b3e94f536e4246681edf34d206965e86b3e94f536e4246"),
    },
    CipherVector {
        name: "SM4-ECB decrypt",
        code: ChCertError::Sm4EcbPut,
        alg: CipherAlgId::Sm4Ecb,
        dir: CipherDirection::Decrypt,
        key: &hex!("0123456789abcdeffedcba9876543210"),
        iv: &[],
        input: &hex!("681edf34d206965e86b3e94f536e4246681edf34d206965e86b3e94f536e4246"),
        output: &hex!("0123456789abcdeffedcba98765432100123456789abcdeffedcba9876543210"),
    },
    CipherVector {
        name: "SM4-CBC encrypt",
        code: ChCertError::Sm4CbcPut,
        alg: CipherAlgId::Sm4Cbc,
        dir: CipherDirection::Encrypt,
        key: &hex!("0123456789abcdeffedcba9876543210"),
        iv: &hex!("000102030405060708090a0b0c0d0e0f"),
        input: &hex!("0123456789abcdeffedcba98765432100123456789abcdeffedcba9876543210"),
        output: &hex!("a9a268883a336315bac0c9c9ff350ab1b236a4a85616d4aabf0a83555c7d4115"),
    },
    CipherVector {
        name: "SM4-CBC decrypt",
        code: ChCertError::Sm4CbcPut,
        alg: CipherAlgId::Sm4Cbc,
        dir: CipherDirection::Decrypt,
        key: &hex!("0123456789abcdeffedcba9876543210"),
        iv: &hex!("000102030405060708090a0b0c0d0e0f"),
        input: &hex!("a9a268883a336315bac0c9c9ff350ab1b236a4a85616d4aabf0a83555c7d4115"),
        output: &hex!("0123456789abcdeffedcba98765432100123456789abcdeffedcba9876543210"),
    },
    CipherVector {
        name: "SM4-CTR encrypt",
        code: ChCertError::Sm4CtrPut,
        alg: CipherAlgId::Sm4Ctr,
        dir: CipherDirection::Encrypt,
        key: &hex!("0123456789abcdeffedcba9876543210"),
        iv: &hex!("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff"),
        input: &hex!("0123456789abcdeffedcba98765432100123456789abcdeffedcba9876543210"),
        output: &hex!("5f01a3a00b6e7d520fbcaf12b12d4aa78f100cd6f0e8ccb4a52ba4581ca1f5d4"),
    },
    CipherVector {
        name: "SM4-CTR decrypt",
        code: ChCertError::Sm4CtrPut,
        alg: CipherAlgId::Sm4Ctr,
        dir: CipherDirection::Decrypt,
        key: &hex!("0123456789abcdeffedcba9876543210"),
        iv: &hex!("f0f1f2f3f4f5f6f7f8f9fafbfcfdfeff"),
        input: &hex!("5f01a3a00b6e7d520fbcaf12b12d4aa78f100cd6f0e8ccb4a52ba4581ca1f5d4"),
        output: &hex!("0123456789abcdeffedcba98765432100123456789abcdeffedcba9876543210"),
    },
];

/// SHA-2 power-up vectors (FIPS 180-4 examples).
pub static HASH: &[HashVector<'static, FipsError>] = &[
    HashVector {
        name: "SHA-256",
        code: FipsError::Sha256Put,
        alg: HashAlgId::Sha256,
        msg: b"abc",
        digest: &hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"),
    },
    HashVector {
        name: "SHA-512",
        code: FipsError::Sha512Put,
        alg: HashAlgId::Sha512,
        msg: b"abc",
        digest: &hex!(
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a"
            "2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        ),
    },
];

/// SM3 power-up vectors (GB/T 32905 examples).
pub static SM3: &[HashVector<'static, ChCertError>] = &[
    HashVector {
        name: "SM3 3-byte",
        code: ChCertError::Sm3Put,
        alg: HashAlgId::Sm3,
        msg: b"abc",
        digest: &hex!("66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"),
    },
    HashVector {
        name: "SM3 64-byte",
        code: ChCertError::Sm3Put,
        alg: HashAlgId::Sm3,
        msg: b"abcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcd",
        digest: &hex!("debe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732"),
    },
];

/// HMAC power-up vectors (RFC 4231 test case 2).
pub static HMAC: &[HmacVector<'static, FipsError>] = &[
    HmacVector {
        name: "HMAC-SHA-256",
        code: FipsError::HmacSha256Put,
        alg: MacAlgId::HmacSha256,
        key: b"Jefe",
        msg: b"what do ya want for nothing?",
        mac: &hex!("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"),
    },
    HmacVector {
        name: "HMAC-SHA-512",
        code: FipsError::HmacSha512Put,
        alg: MacAlgId::HmacSha512,
        key: b"Jefe",
        msg: b"what do ya want for nothing?",
        mac: &hex!(
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554"
            "9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        ),
    },
];

/// CTR-DRBG AES-256 with df, prediction-resistance flow.
pub static PRNG: &[DrbgVector<'static, FipsError>] = &[
    DrbgVector {
        name: "CTR-DRBG AES-256 no additional input",
        code: FipsError::PrngPut,
        entropy: &hex!("a15b78da0c1783b069328714154d8269ee82c75b7ad02ffb7509f02f1c6605ca"),
        nonce: &hex!("ba078e1cb8c9940e8d1e86b6984cba9f"),
        personalization: &hex!("2a100238dfa443d7f61582ea54e22460e19d7590e45aede9722a4cd546e48d63"),
        entropy_pr1: &hex!("d06d902740581d60a841a81d55716d22cd3950e7297747945fce3db20b295b19"),
        addin1: &[],
        entropy_pr2: &hex!("5037fcd3df3a27ad8db5a2a6b5ca93bbefe6004ca81c8da2cb43f05e535381d0"),
        addin2: &[],
        output: &hex!(
            "4741d092899396b60d3eaa4ac22040e662cdd1bb64466c6d417ccceda97cb5f6"
            "5ba61b59a96ca1b0116be0ea7aef92b7918e2242788a7589e2b2ee28340bf0f5"
        ),
    },
    DrbgVector {
        name: "CTR-DRBG AES-256 with additional input",
        code: FipsError::PrngPut,
        entropy: &hex!("15fa6979a420132c620578268c64abe14aa97aa4914a423684d37974700ab8a7"),
        nonce: &hex!("458257c4aaf5b3f205aed94bfe8f50cf"),
        personalization: &hex!("65b50fd5ce94afa2527094de2d9c90f941c9c863f10a4e85c39b076f3c389bb3"),
        entropy_pr1: &hex!("0363ab645b5c3919a3e516133744d27a2daa4668e9415ae210e78a5c78f7ce22"),
        addin1: &hex!("7eacc8d7e4112f966f33d24adbb00fa6a19f05310970abe05e26a40fbadbd618"),
        entropy_pr2: &hex!("e7f2cc8c2461a8b7ea41f6b04a5d545dc420fc19b7ad1bd52e2c44b0b6937269"),
        addin2: &hex!("70de532253d842c071c87de2964d2688f1317b0a549f10726ffcc1aca53673be"),
        output: &hex!(
            "6543dbe02e4176894b9ceda6fe3f37686b8e95c8f2a068a9bf07a19f780db512"
            "7843b47223c5c0bf270edbc2ec617ab8ac8ce076680ff75c6026467b81885d33"
        ),
    },
];
