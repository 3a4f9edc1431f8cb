/// Returns a `Box<[T; LEN]>` filled with `elem`.
#[inline(always)]
pub fn boxed_array<T: Clone, const LEN: usize>(elem: T) -> Box<[T; LEN]> {
    vec![elem; LEN].into_boxed_slice().try_into().ok().unwrap()
}

/// Sign extends the lowest `BITS` bits of `value` to the full 64 bits.
#[inline(always)]
pub const fn sign_extend<const BITS: u32>(value: u64) -> u64 {
    let shift = 64 - BITS;
    (((value << shift) as i64) >> shift) as u64
}

/// Sign extends the lowest `BITS` bits of `value` to the full 16 bits.
#[inline(always)]
pub const fn sign_extend16<const BITS: u32>(value: u16) -> u16 {
    let shift = 16 - BITS;
    (((value << shift) as i16) >> shift) as u16
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sign_extension() {
        assert_eq!(sign_extend::<40>(0x80_0000_0000), 0xFFFF_FF80_0000_0000);
        assert_eq!(sign_extend::<40>(0x7F_FFFF_FFFF), 0x7F_FFFF_FFFF);
        assert_eq!(sign_extend::<16>(0x8000), 0xFFFF_FFFF_FFFF_8000);
        assert_eq!(sign_extend16::<7>(0x40), 0xFFC0);
        assert_eq!(sign_extend16::<7>(0x3F), 0x003F);
    }

    #[test]
    fn boxed() {
        let array = boxed_array::<u16, 8>(0xABCD);
        assert!(array.iter().all(|v| *v == 0xABCD));
    }
}
