//! The register file.
//!
//! Registers are kept as plain structured fields. The packed pseudo-registers (`st0`, `mod3`,
//! `ar0`, ...) only exist at the access boundary: [`Registers::pseudo`] packs them and
//! [`Registers::set_pseudo`] unpacks them, ignoring read-only slots.

use crate::ins::operand::{Cond, RegName};
use bitos::{
    bitos,
    integer::{u2, u3, u4, u7, u9},
};

/// One frame of the block repeat stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockRepeatFrame {
    pub start: u32,
    pub end: u32,
    pub lc: u16,
}

/// Shadow of one `ar` configuration pair or one `arp` configuration.
#[derive(Debug, Clone, Copy, Default)]
struct IndirectShadow {
    rni: u8,
    rnj: u8,
    stepi: u8,
    stepj: u8,
    offseti: u8,
    offsetj: u8,
}

/// Copies taken by context store and swapped back by context restore.
#[derive(Debug, Clone, Default)]
struct Shadows {
    // stored/restored
    flm: bool,
    fvl: bool,
    fe: bool,
    fc0: bool,
    fc1: bool,
    fv: bool,
    fn_: bool,
    fm: bool,
    fz: bool,
    fr: bool,

    // swapped
    pcmhi: u8,
    sat: bool,
    sata: bool,
    hwm: u8,
    s: bool,
    ps: [u8; 2],
    page: u8,
    stp16: bool,
    cmd: bool,
    m: [bool; 8],
    br: [bool; 8],
    im: [bool; 3],
    imv: bool,
    epi: bool,
    epj: bool,

    ar: [IndirectShadow; 2],
    arp: [IndirectShadow; 4],
}

#[derive(Debug, Clone)]
pub struct Registers {
    // program control
    pub pc: u32,
    pub prpage: u16,
    pub cpc: bool,

    pub repc: u16,
    pub repcs: u16,
    pub rep: bool,
    pub crep: bool,

    pub bcn: u8,
    pub lp: bool,
    pub bkrep_stack: [BlockRepeatFrame; 4],

    // computation
    pub a: [u64; 2],
    pub b: [u64; 2],
    pub a1s: u64,
    pub b1s: u64,
    pub ccnta: bool,

    pub sat: bool,
    pub sata: bool,
    pub s: bool,
    pub sv: u16,

    pub fz: bool,
    pub fm: bool,
    pub fn_: bool,
    pub fv: bool,
    pub fe: bool,
    pub fc0: bool,
    pub fc1: bool,
    pub flm: bool,
    pub fvl: bool,
    pub fr: bool,

    pub vtr0: u16,
    pub vtr1: u16,

    // multiplication
    pub x: [u16; 2],
    pub y: [u16; 2],
    pub hwm: u8,
    pub p: [u32; 2],
    pub pe: [bool; 2],
    pub ps: [u8; 2],
    pub p0h_cbs: u16,

    // addressing
    pub r: [u16; 8],
    pub mixp: u16,
    pub sp: u16,
    pub page: u8,
    pub pcmhi: u8,

    pub r0b: u16,
    pub r1b: u16,
    pub r4b: u16,
    pub r7b: u16,

    pub stepi: u16,
    pub stepj: u16,
    pub modi: u16,
    pub modj: u16,
    pub stepi0: u16,
    pub stepj0: u16,

    pub stepib: u16,
    pub stepjb: u16,
    pub modib: u16,
    pub modjb: u16,
    pub stepi0b: u16,
    pub stepj0b: u16,

    pub m: [bool; 8],
    pub br: [bool; 8],
    pub stp16: bool,
    pub cmd: bool,
    pub epi: bool,
    pub epj: bool,

    // indirect addressing configuration
    pub arstep: [u8; 4],
    pub arpstepi: [u8; 4],
    pub arpstepj: [u8; 4],
    pub aroffset: [u8; 4],
    pub arpoffseti: [u8; 4],
    pub arpoffsetj: [u8; 4],
    pub arrn: [u8; 4],
    pub arprni: [u8; 4],
    pub arprnj: [u8; 4],

    // interrupts
    pub ip: [bool; 3],
    pub ipv: bool,
    pub im: [bool; 3],
    pub imv: bool,
    pub ic: [bool; 3],
    pub nimc: bool,
    pub ie: bool,

    // extension
    pub ou: [bool; 5],
    pub iu: [bool; 2],
    pub ext: [u16; 4],

    shadows: Shadows,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            pc: 0,
            prpage: 0,
            cpc: true,
            repc: 0,
            repcs: 0,
            rep: false,
            crep: true,
            bcn: 0,
            lp: false,
            bkrep_stack: Default::default(),
            a: [0; 2],
            b: [0; 2],
            a1s: 0,
            b1s: 0,
            ccnta: true,
            sat: false,
            sata: true,
            s: false,
            sv: 0,
            fz: false,
            fm: false,
            fn_: false,
            fv: false,
            fe: false,
            fc0: false,
            fc1: false,
            flm: false,
            fvl: false,
            fr: false,
            vtr0: 0,
            vtr1: 0,
            x: [0; 2],
            y: [0; 2],
            hwm: 0,
            p: [0; 2],
            pe: [false; 2],
            ps: [0; 2],
            p0h_cbs: 0,
            r: [0; 8],
            mixp: 0,
            sp: 0,
            page: 0,
            pcmhi: 0,
            r0b: 0,
            r1b: 0,
            r4b: 0,
            r7b: 0,
            stepi: 0,
            stepj: 0,
            modi: 0,
            modj: 0,
            stepi0: 0,
            stepj0: 0,
            stepib: 0,
            stepjb: 0,
            modib: 0,
            modjb: 0,
            stepi0b: 0,
            stepj0b: 0,
            m: [false; 8],
            br: [false; 8],
            stp16: false,
            cmd: true,
            epi: false,
            epj: false,
            arstep: [1, 4, 5, 3],
            arpstepi: [1, 4, 5, 3],
            arpstepj: [1, 4, 5, 3],
            aroffset: [0, 1, 2, 0],
            arpoffseti: [0, 1, 2, 0],
            arpoffsetj: [0, 1, 2, 0],
            arrn: [0, 4, 2, 6],
            arprni: [0, 1, 2, 3],
            arprnj: [0, 1, 2, 3],
            ip: [false; 3],
            ipv: false,
            im: [false; 3],
            imv: false,
            ic: [false; 3],
            nimc: false,
            ie: false,
            ou: [false; 5],
            iu: [false; 2],
            ext: [0; 4],
            shadows: Shadows::default(),
        }
    }
}

#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Cfg {
    #[bits(0..7)]
    pub step: u7,
    #[bits(7..16)]
    pub modulo: u9,
}

#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Stt0 {
    #[bits(0)]
    pub flm: bool,
    #[bits(1)]
    pub fvl: bool,
    #[bits(2)]
    pub fe: bool,
    #[bits(3)]
    pub fc0: bool,
    #[bits(4)]
    pub fv: bool,
    #[bits(5)]
    pub fn_: bool,
    #[bits(6)]
    pub fm: bool,
    #[bits(7)]
    pub fz: bool,
    #[bits(11)]
    pub fc1: bool,
}

#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Stt1 {
    #[bits(4)]
    pub fr: bool,
    #[bits(10..12)]
    pub iu: [bool; 2],
    #[bits(14..16)]
    pub pe: [bool; 2],
}

#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Stt2 {
    #[bits(0..3)]
    pub ip: [bool; 3],
    #[bits(3)]
    pub ipv: bool,
    #[bits(6..8)]
    pub pcmhi: u2,
    #[bits(12..15)]
    pub bcn: u3,
    #[bits(15)]
    pub lp: bool,
}

#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Mod0 {
    #[bits(0)]
    pub sat: bool,
    #[bits(1)]
    pub sata: bool,
    #[bits(2..5)]
    pub unknown: u3,
    #[bits(5..7)]
    pub hwm: u2,
    #[bits(7)]
    pub s: bool,
    #[bits(8..10)]
    pub ou: [bool; 2],
    #[bits(10..12)]
    pub ps0: u2,
    #[bits(13..15)]
    pub ps1: u2,
}

#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Mod1 {
    #[bits(0..8)]
    pub page: u8,
    #[bits(12)]
    pub stp16: bool,
    #[bits(13)]
    pub cmd: bool,
    #[bits(14)]
    pub epi: bool,
    #[bits(15)]
    pub epj: bool,
}

#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Mod2 {
    #[bits(0..8)]
    pub m: [bool; 8],
    #[bits(8..16)]
    pub br: [bool; 8],
}

#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Mod3 {
    #[bits(0)]
    pub nimc: bool,
    #[bits(1..4)]
    pub ic: [bool; 3],
    #[bits(4..7)]
    pub ou: [bool; 3],
    #[bits(7)]
    pub ie: bool,
    #[bits(8..11)]
    pub im: [bool; 3],
    #[bits(11)]
    pub imv: bool,
    #[bits(13)]
    pub ccnta: bool,
    #[bits(14)]
    pub cpc: bool,
    #[bits(15)]
    pub crep: bool,
}

#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct St0 {
    #[bits(0)]
    pub sat: bool,
    #[bits(1)]
    pub ie: bool,
    #[bits(2..4)]
    pub im: [bool; 2],
    #[bits(4)]
    pub fr: bool,
    #[bits(5)]
    pub flm_fvl: bool,
    #[bits(6)]
    pub fe: bool,
    #[bits(7)]
    pub fc0: bool,
    #[bits(8)]
    pub fv: bool,
    #[bits(9)]
    pub fn_: bool,
    #[bits(10)]
    pub fm: bool,
    #[bits(11)]
    pub fz: bool,
    #[bits(12..16)]
    pub a0e: u4,
}

#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct St1 {
    #[bits(0..8)]
    pub page: u8,
    #[bits(10..12)]
    pub ps0: u2,
    #[bits(12..16)]
    pub a1e: u4,
}

#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct St2 {
    #[bits(0..6)]
    pub m: [bool; 6],
    #[bits(6)]
    pub im2: bool,
    #[bits(7)]
    pub s: bool,
    #[bits(8..10)]
    pub ou: [bool; 2],
    #[bits(10..12)]
    pub iu: [bool; 2],
    #[bits(13)]
    pub ip2: bool,
    #[bits(14)]
    pub ip0: bool,
    #[bits(15)]
    pub ip1: bool,
}

#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Icr {
    #[bits(0)]
    pub nimc: bool,
    #[bits(1..4)]
    pub ic: [bool; 3],
    #[bits(4)]
    pub lp: bool,
    #[bits(5..8)]
    pub bcn: u3,
}

/// Indirect addressing configuration `ar0`/`ar1`. Slot `j` is `2 * index + 1`, slot `i` is
/// `2 * index`.
#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Ar {
    #[bits(0..3)]
    pub stepj: u3,
    #[bits(3..5)]
    pub offsetj: u2,
    #[bits(5..8)]
    pub stepi: u3,
    #[bits(8..10)]
    pub offseti: u2,
    #[bits(10..13)]
    pub rnj: u3,
    #[bits(13..16)]
    pub rni: u3,
}

/// Paired indirect addressing configuration `arp0`..`arp3`.
#[bitos(16)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Arp {
    #[bits(0..3)]
    pub stepi: u3,
    #[bits(3..5)]
    pub offseti: u2,
    #[bits(5..8)]
    pub stepj: u3,
    #[bits(8..10)]
    pub offsetj: u2,
    #[bits(10..12)]
    pub rni: u2,
    #[bits(13..15)]
    pub rnj: u2,
}

#[inline(always)]
fn u2_of(value: u8) -> u2 {
    u2::new(value & 0b11)
}

#[inline(always)]
fn u3_of(value: u8) -> u3 {
    u3::new(value & 0b111)
}

/// Extension bits 32..36 of an accumulator.
#[inline(always)]
fn acc_ext(acc: u64) -> u4 {
    u4::new(((acc >> 32) & 0xF) as u8)
}

/// Replaces the extension bits of an accumulator, sign extending the 4-bit value.
#[inline(always)]
fn with_acc_ext(acc: u64, ext: u4) -> u64 {
    let ext = util::sign_extend::<4>(ext.value() as u64);
    (acc & 0xFFFF_FFFF) | (ext << 32)
}

impl Registers {
    /// The loop counter of the innermost active block repeat.
    pub fn lc(&self) -> u16 {
        if self.lp {
            self.bkrep_stack[self.bcn as usize - 1].lc
        } else {
            self.bkrep_stack[0].lc
        }
    }

    pub fn lc_mut(&mut self) -> &mut u16 {
        if self.lp {
            &mut self.bkrep_stack[self.bcn as usize - 1].lc
        } else {
            &mut self.bkrep_stack[0].lc
        }
    }

    /// Evaluates a condition against the current flags.
    pub fn condition(&self, cond: Cond) -> bool {
        match cond {
            Cond::True => true,
            Cond::Eq => self.fz,
            Cond::Neq => !self.fz,
            Cond::Gt => !self.fz && !self.fm,
            Cond::Ge => !self.fm,
            Cond::Lt => self.fm,
            Cond::Le => self.fm || self.fz,
            Cond::Nn => !self.fn_,
            Cond::C => self.fc0,
            Cond::V => self.fv,
            Cond::E => self.fe,
            Cond::L => self.flm || self.fvl,
            Cond::Nr => !self.fr,
            Cond::Niu0 => !self.iu[0],
            Cond::Iu0 => self.iu[0],
            Cond::Iu1 => self.iu[1],
        }
    }

    /// Copies the flags into their shadows.
    pub fn shadow_store(&mut self) {
        let s = &mut self.shadows;
        s.flm = self.flm;
        s.fvl = self.fvl;
        s.fe = self.fe;
        s.fc0 = self.fc0;
        s.fc1 = self.fc1;
        s.fv = self.fv;
        s.fn_ = self.fn_;
        s.fm = self.fm;
        s.fz = self.fz;
        s.fr = self.fr;
    }

    /// Copies the flags back from their shadows.
    pub fn shadow_restore(&mut self) {
        let s = &self.shadows;
        self.flm = s.flm;
        self.fvl = s.fvl;
        self.fe = s.fe;
        self.fc0 = s.fc0;
        self.fc1 = s.fc1;
        self.fv = s.fv;
        self.fn_ = s.fn_;
        self.fm = s.fm;
        self.fz = s.fz;
        self.fr = s.fr;
    }

    /// Exchanges the banked mode registers and all indirect addressing configurations with
    /// their shadows.
    pub fn shadow_swap(&mut self) {
        macro_rules! swap {
            ($($field:ident),*) => {
                $(std::mem::swap(&mut self.$field, &mut self.shadows.$field);)*
            };
        }

        swap!(
            pcmhi, sat, sata, hwm, s, ps, page, stp16, cmd, m, br, im, imv, epi, epj
        );

        self.swap_all_ar_arp();
    }

    pub fn swap_ar(&mut self, index: usize) {
        let shadow = &mut self.shadows.ar[index];
        let (i, j) = (index * 2, index * 2 + 1);

        std::mem::swap(&mut self.arrn[i], &mut shadow.rni);
        std::mem::swap(&mut self.arrn[j], &mut shadow.rnj);
        std::mem::swap(&mut self.arstep[i], &mut shadow.stepi);
        std::mem::swap(&mut self.arstep[j], &mut shadow.stepj);
        std::mem::swap(&mut self.aroffset[i], &mut shadow.offseti);
        std::mem::swap(&mut self.aroffset[j], &mut shadow.offsetj);
    }

    pub fn swap_arp(&mut self, index: usize) {
        let shadow = &mut self.shadows.arp[index];

        std::mem::swap(&mut self.arprni[index], &mut shadow.rni);
        std::mem::swap(&mut self.arprnj[index], &mut shadow.rnj);
        std::mem::swap(&mut self.arpstepi[index], &mut shadow.stepi);
        std::mem::swap(&mut self.arpstepj[index], &mut shadow.stepj);
        std::mem::swap(&mut self.arpoffseti[index], &mut shadow.offseti);
        std::mem::swap(&mut self.arpoffsetj[index], &mut shadow.offsetj);
    }

    pub fn swap_all_ar_arp(&mut self) {
        for index in 0..2 {
            self.swap_ar(index);
        }

        for index in 0..4 {
            self.swap_arp(index);
        }
    }

    fn ar(&self, index: usize) -> u16 {
        let (i, j) = (index * 2, index * 2 + 1);
        Ar::default()
            .with_stepj(u3_of(self.arstep[j]))
            .with_offsetj(u2_of(self.aroffset[j]))
            .with_stepi(u3_of(self.arstep[i]))
            .with_offseti(u2_of(self.aroffset[i]))
            .with_rnj(u3_of(self.arrn[j]))
            .with_rni(u3_of(self.arrn[i]))
            .to_bits()
    }

    fn set_ar(&mut self, index: usize, value: u16) {
        let (i, j) = (index * 2, index * 2 + 1);
        let ar = Ar::from_bits(value);
        self.arstep[j] = ar.stepj().value();
        self.aroffset[j] = ar.offsetj().value();
        self.arstep[i] = ar.stepi().value();
        self.aroffset[i] = ar.offseti().value();
        self.arrn[j] = ar.rnj().value();
        self.arrn[i] = ar.rni().value();
    }

    fn arp(&self, index: usize) -> u16 {
        Arp::default()
            .with_stepi(u3_of(self.arpstepi[index]))
            .with_offseti(u2_of(self.arpoffseti[index]))
            .with_stepj(u3_of(self.arpstepj[index]))
            .with_offsetj(u2_of(self.arpoffsetj[index]))
            .with_rni(u2_of(self.arprni[index]))
            .with_rnj(u2_of(self.arprnj[index]))
            .to_bits()
    }

    fn set_arp(&mut self, index: usize, value: u16) {
        let arp = Arp::from_bits(value);
        self.arpstepi[index] = arp.stepi().value();
        self.arpoffseti[index] = arp.offseti().value();
        self.arpstepj[index] = arp.stepj().value();
        self.arpoffsetj[index] = arp.offsetj().value();
        self.arprni[index] = arp.rni().value();
        self.arprnj[index] = arp.rnj().value();
    }

    /// Writing a non-zero `lp` bit aborts every active block repeat.
    fn write_lp(&mut self, value: bool) {
        if value {
            self.lp = false;
            self.bcn = 0;
        }
    }

    /// Packs a pseudo-register. Returns `None` for names that are not pseudo-registers.
    pub fn pseudo(&self, name: RegName) -> Option<u16> {
        Some(match name {
            RegName::Cfgi => Cfg::default()
                .with_step(u7::new((self.stepi & 0x7F) as u8))
                .with_modulo(u9::new(self.modi & 0x1FF))
                .to_bits(),
            RegName::Cfgj => Cfg::default()
                .with_step(u7::new((self.stepj & 0x7F) as u8))
                .with_modulo(u9::new(self.modj & 0x1FF))
                .to_bits(),
            RegName::Stt0 => Stt0::default()
                .with_flm(self.flm)
                .with_fvl(self.fvl)
                .with_fe(self.fe)
                .with_fc0(self.fc0)
                .with_fv(self.fv)
                .with_fn_(self.fn_)
                .with_fm(self.fm)
                .with_fz(self.fz)
                .with_fc1(self.fc1)
                .to_bits(),
            RegName::Stt1 => Stt1::default()
                .with_fr(self.fr)
                .with_iu(self.iu)
                .with_pe(self.pe)
                .to_bits(),
            RegName::Stt2 => Stt2::default()
                .with_ip(self.ip)
                .with_ipv(self.ipv)
                .with_pcmhi(u2_of(self.pcmhi))
                .with_bcn(u3_of(self.bcn))
                .with_lp(self.lp)
                .to_bits(),
            RegName::Mod0 => Mod0::default()
                .with_sat(self.sat)
                .with_sata(self.sata)
                .with_unknown(u3::new(1))
                .with_hwm(u2_of(self.hwm))
                .with_s(self.s)
                .with_ou([self.ou[0], self.ou[1]])
                .with_ps0(u2_of(self.ps[0]))
                .with_ps1(u2_of(self.ps[1]))
                .to_bits(),
            RegName::Mod1 => Mod1::default()
                .with_page(self.page)
                .with_stp16(self.stp16)
                .with_cmd(self.cmd)
                .with_epi(self.epi)
                .with_epj(self.epj)
                .to_bits(),
            RegName::Mod2 => Mod2::default().with_m(self.m).with_br(self.br).to_bits(),
            RegName::Mod3 => Mod3::default()
                .with_nimc(self.nimc)
                .with_ic(self.ic)
                .with_ou([self.ou[2], self.ou[3], self.ou[4]])
                .with_ie(self.ie)
                .with_im(self.im)
                .with_imv(self.imv)
                .with_ccnta(self.ccnta)
                .with_cpc(self.cpc)
                .with_crep(self.crep)
                .to_bits(),
            RegName::St0 => St0::default()
                .with_sat(self.sat)
                .with_ie(self.ie)
                .with_im([self.im[0], self.im[1]])
                .with_fr(self.fr)
                .with_flm_fvl(self.flm | self.fvl)
                .with_fe(self.fe)
                .with_fc0(self.fc0)
                .with_fv(self.fv)
                .with_fn_(self.fn_)
                .with_fm(self.fm)
                .with_fz(self.fz)
                .with_a0e(acc_ext(self.a[0]))
                .to_bits(),
            RegName::St1 => St1::default()
                .with_page(self.page)
                .with_ps0(u2_of(self.ps[0]))
                .with_a1e(acc_ext(self.a[1]))
                .to_bits(),
            RegName::St2 => {
                let mut m = [false; 6];
                m.copy_from_slice(&self.m[..6]);

                St2::default()
                    .with_m(m)
                    .with_im2(self.im[2])
                    .with_s(self.s)
                    .with_ou([self.ou[0], self.ou[1]])
                    .with_iu(self.iu)
                    .with_ip2(self.ip[2])
                    .with_ip0(self.ip[0])
                    .with_ip1(self.ip[1])
                    .to_bits()
            }
            RegName::Ar0 => self.ar(0),
            RegName::Ar1 => self.ar(1),
            RegName::Arp0 => self.arp(0),
            RegName::Arp1 => self.arp(1),
            RegName::Arp2 => self.arp(2),
            RegName::Arp3 => self.arp(3),
            _ => return None,
        })
    }

    /// Unpacks a pseudo-register. Returns `false` for names that are not pseudo-registers.
    pub fn set_pseudo(&mut self, name: RegName, value: u16) -> bool {
        match name {
            RegName::Cfgi => {
                let cfg = Cfg::from_bits(value);
                self.stepi = cfg.step().value() as u16;
                self.modi = cfg.modulo().value();
            }
            RegName::Cfgj => {
                let cfg = Cfg::from_bits(value);
                self.stepj = cfg.step().value() as u16;
                self.modj = cfg.modulo().value();
            }
            RegName::Stt0 => {
                let stt0 = Stt0::from_bits(value);
                self.flm = stt0.flm();
                self.fvl = stt0.fvl();
                self.fe = stt0.fe();
                self.fc0 = stt0.fc0();
                self.fv = stt0.fv();
                self.fn_ = stt0.fn_();
                self.fm = stt0.fm();
                self.fz = stt0.fz();
                self.fc1 = stt0.fc1();
            }
            RegName::Stt1 => {
                let stt1 = Stt1::from_bits(value);
                self.fr = stt1.fr();
                self.pe = stt1.pe();
            }
            RegName::Stt2 => {
                let stt2 = Stt2::from_bits(value);
                self.pcmhi = stt2.pcmhi().value();
                self.write_lp(stt2.lp());
            }
            RegName::Mod0 => {
                let mod0 = Mod0::from_bits(value);
                self.sat = mod0.sat();
                self.sata = mod0.sata();
                self.hwm = mod0.hwm().value();
                self.s = mod0.s();
                let [ou0, ou1] = mod0.ou();
                self.ou[0] = ou0;
                self.ou[1] = ou1;
                self.ps[0] = mod0.ps0().value();
                self.ps[1] = mod0.ps1().value();
            }
            RegName::Mod1 => {
                let mod1 = Mod1::from_bits(value);
                self.page = mod1.page();
                self.stp16 = mod1.stp16();
                self.cmd = mod1.cmd();
                self.epi = mod1.epi();
                self.epj = mod1.epj();
            }
            RegName::Mod2 => {
                let mod2 = Mod2::from_bits(value);
                self.m = mod2.m();
                self.br = mod2.br();
            }
            RegName::Mod3 => {
                let mod3 = Mod3::from_bits(value);
                self.nimc = mod3.nimc();
                self.ic = mod3.ic();
                let [ou2, ou3, ou4] = mod3.ou();
                self.ou[2] = ou2;
                self.ou[3] = ou3;
                self.ou[4] = ou4;
                self.ie = mod3.ie();
                self.im = mod3.im();
                self.imv = mod3.imv();
                self.ccnta = mod3.ccnta();
                self.cpc = mod3.cpc();
                self.crep = mod3.crep();
            }
            RegName::St0 => {
                let st0 = St0::from_bits(value);
                self.sat = st0.sat();
                self.ie = st0.ie();
                let [im0, im1] = st0.im();
                self.im[0] = im0;
                self.im[1] = im1;
                self.fr = st0.fr();
                self.flm = st0.flm_fvl();
                self.fvl = st0.flm_fvl();
                self.fe = st0.fe();
                self.fc0 = st0.fc0();
                self.fv = st0.fv();
                self.fn_ = st0.fn_();
                self.fm = st0.fm();
                self.fz = st0.fz();
                self.a[0] = with_acc_ext(self.a[0], st0.a0e());
            }
            RegName::St1 => {
                let st1 = St1::from_bits(value);
                self.page = st1.page();
                self.ps[0] = st1.ps0().value();
                self.a[1] = with_acc_ext(self.a[1], st1.a1e());
            }
            RegName::St2 => {
                let st2 = St2::from_bits(value);
                self.m[..6].copy_from_slice(&st2.m());
                self.im[2] = st2.im2();
                self.s = st2.s();
                let [ou0, ou1] = st2.ou();
                self.ou[0] = ou0;
                self.ou[1] = ou1;
            }
            RegName::Ar0 => self.set_ar(0, value),
            RegName::Ar1 => self.set_ar(1, value),
            RegName::Arp0 => self.set_arp(0, value),
            RegName::Arp1 => self.set_arp(1, value),
            RegName::Arp2 => self.set_arp(2, value),
            RegName::Arp3 => self.set_arp(3, value),
            _ => return false,
        }

        true
    }

    /// Packs the `icr` register.
    pub fn icr(&self) -> u16 {
        Icr::default()
            .with_nimc(self.nimc)
            .with_ic(self.ic)
            .with_lp(self.lp)
            .with_bcn(u3_of(self.bcn))
            .to_bits()
    }

    /// Unpacks the `icr` register.
    pub fn set_icr(&mut self, value: u16) {
        let icr = Icr::from_bits(value);
        self.nimc = icr.nimc();
        self.ic = icr.ic();
        self.write_lp(icr.lp());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn mod0_reads_constant_bits() {
        let regs = Registers::default();
        // sata and the constant slot are set after reset
        assert_eq!(regs.pseudo(RegName::Mod0), Some(0b0000_0000_0000_0110));
    }

    #[test]
    fn mod3_defaults() {
        let regs = Registers::default();
        assert_eq!(regs.pseudo(RegName::Mod3), Some(0xE000));
    }

    #[test]
    fn ar_layout() {
        let regs = Registers::default();
        // rni = 0, rnj = 4, stepi = 1, offseti = 0, stepj = 4, offsetj = 1
        assert_eq!(regs.pseudo(RegName::Ar0), Some((4 << 10) | (1 << 5) | (1 << 3) | 4));

        let mut regs = Registers::default();
        regs.set_pseudo(RegName::Ar1, 0xFFFF);
        assert_eq!(regs.arrn, [0, 4, 7, 7]);
        assert_eq!(regs.arstep, [1, 4, 7, 7]);
        assert_eq!(regs.aroffset, [0, 1, 3, 3]);
    }

    #[test]
    fn st0_flm_fvl_slot() {
        let mut regs = Registers::default();
        regs.set_pseudo(RegName::St0, 1 << 5);
        assert!(regs.flm && regs.fvl);

        regs.flm = false;
        assert_eq!(regs.pseudo(RegName::St0).unwrap() & (1 << 5), 1 << 5);
    }

    #[test]
    fn st0_writes_a0_extension() {
        let mut regs = Registers::default();
        regs.a[0] = 0x1234_5678;
        regs.set_pseudo(RegName::St0, 0x8000);
        assert_eq!(regs.a[0], 0xFFFF_FFF8_1234_5678);
        assert_eq!(regs.pseudo(RegName::St0).unwrap() >> 12, 0x8);
    }

    #[test]
    fn read_only_slots_are_ignored() {
        let mut regs = Registers::default();
        regs.set_pseudo(RegName::Stt2, 0x7007);
        assert_eq!(regs.ip, [false; 3]);
        assert_eq!(regs.bcn, 0);
    }

    #[test]
    fn writing_lp_aborts_loops() {
        let mut regs = Registers::default();
        regs.lp = true;
        regs.bcn = 2;
        regs.set_icr(1 << 4);
        assert!(!regs.lp);
        assert_eq!(regs.bcn, 0);
    }

    #[test]
    fn context_swap_round_trips() {
        let mut regs = Registers::default();
        regs.page = 0x12;
        regs.arrn[0] = 5;
        regs.shadow_swap();
        assert_eq!(regs.page, 0);
        assert_eq!(regs.arrn[0], 0);
        regs.shadow_swap();
        assert_eq!(regs.page, 0x12);
        assert_eq!(regs.arrn[0], 5);
    }

    #[test]
    fn conditions() {
        let mut regs = Registers::default();
        regs.fz = true;
        assert!(regs.condition(Cond::Eq));
        assert!(regs.condition(Cond::Le));
        assert!(!regs.condition(Cond::Gt));
        regs.fvl = true;
        assert!(regs.condition(Cond::L));
    }
}
