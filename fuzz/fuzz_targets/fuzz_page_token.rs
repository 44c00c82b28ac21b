#![no_main]

use libfuzzer_sys::fuzz_target;
use users_directory::domain::page_token::PageToken;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Anything that decodes must survive a re-encode unchanged
        if let Ok(token) = PageToken::decode(s) {
            let encoded = token.encode().expect("decoded token re-encodes");
            let again = PageToken::decode(&encoded).expect("re-encoded token decodes");
            assert_eq!(again, token);
        }
    }
});
